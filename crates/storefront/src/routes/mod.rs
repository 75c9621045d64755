//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the backend)
//!
//! # Catalog
//! GET  /catalog                - Enabled products, rank-sorted
//! GET  /catalog/search?q=      - Typeahead search
//!
//! # Cart (session-scoped ledger)
//! GET  /cart                   - Full cart view
//! POST /cart/add               - Add one unit {code}
//! POST /cart/update            - Apply delta {code, delta}
//! POST /cart/remove            - Remove line {code}
//! GET  /cart/count             - Badge count
//!
//! # Shipping
//! POST /shipping/quote         - Estimate to a destination {destination}
//!
//! # Checkout
//! GET  /checkout/delivery-days - Upcoming delivery dates
//! POST /checkout               - Validate, assemble, submit
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Session keys for storefront state.
pub mod session_keys {
    /// The visitor's cart ledger.
    pub const CART: &str = "cart.ledger";
    /// The shipping-quote slot (sequencing + applied fee).
    pub const QUOTE_SLOT: &str = "shipping.quote_slot";
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/search", get(catalog::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/delivery-days", get(checkout::delivery_days))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog_routes())
        .nest("/cart", cart_routes())
        .route("/shipping/quote", post(shipping::quote))
        .nest("/checkout", checkout_routes())
}
