//! Integration tests for Almacen.
//!
//! These tests exercise flows that span crates without a live backend:
//! the shipping estimator against stub distance lookups, cart-to-draft
//! checkout assembly, reorder planning, and the CSV catalog feed.
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart ledger through draft assembly and wire shape
//! - `shipping_estimates` - Estimator caching, sentinel, sequencing
//! - `admin_orders` - Wire conversion, listing filters, monthly summary
//! - `csv_catalog` - Feed parsing into a browsable catalog
