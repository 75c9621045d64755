//! Core types for Almacen.
//!
//! This module provides the domain model shared by the storefront, the
//! admin service, and the CLI.

pub mod config;
pub mod order;
pub mod product;

pub use config::{ConfigValidationError, DeliveryDay, ShippingTier, ShopConfig};
pub use order::{ContactDetails, Order, OrderDraft, OrderItem, OrderStatus};
pub use product::{Product, ProductCode, ProductCodeError};
