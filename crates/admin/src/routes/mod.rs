//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//!
//! # Auth (backend bearer token, held in the session)
//! POST /login                        - Exchange credentials for a token
//! POST /logout                       - Drop the session
//!
//! # Products
//! GET  /products                     - Full list, display order
//! GET  /products/search?q=&limit=    - Backend typeahead
//! POST /products/{id}/move           - One-step move {direction}
//! POST /products/reorder             - Drag-drop sequence {ids}
//! PUT  /products/{id}/rank           - Direct rank set {rank}
//! PUT  /products/{id}/state          - Enable/disable {enabled}
//! POST /products/image/{code}        - Upload image (multipart)
//! POST /products/image/delete        - Delete image {path}
//! POST /products/import              - Excel sheet, forwarded (multipart)
//! POST /products/import-ranks        - Rank CSV, parsed locally (multipart)
//! POST /products/import-enabled      - Enabled-code list (JSON)
//!
//! # Orders
//! GET  /orders                       - Filtered list (q, status, month, ...)
//! POST /orders                       - Manual order
//! GET  /orders/summary?month=        - Monthly revenue summary
//! GET  /orders/summary/months        - Months with orders
//! GET  /orders/{id}                  - Detail with lines
//! PUT  /orders/{id}                  - Partial update / line replacement
//! DELETE /orders/{id}                - Delete order
//! DELETE /orders/{id}/items/{item}   - Delete one line
//! POST /orders/{id}/confirm          - Toggle confirmed {value}
//! POST /orders/{id}/deliver          - Toggle delivered {value}
//! POST /orders/import                - Excel sheet, forwarded (multipart)
//!
//! # Configuration
//! GET  /config                       - Shop configuration
//! PUT  /config                       - Validate and persist
//! ```

pub mod auth;
pub mod config;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
        .route("/reorder", post(products::reorder))
        .route("/{id}/move", post(products::move_product))
        .route("/{id}/rank", put(products::set_rank))
        .route("/{id}/state", put(products::set_state))
        .route("/image/{code}", post(products::upload_image))
        .route("/image/delete", post(products::delete_image))
        .route("/import", post(products::import))
        .route("/import-ranks", post(products::import_ranks))
        .route("/import-enabled", post(products::import_enabled))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/summary", get(orders::summary))
        .route("/summary/months", get(orders::summary_months))
        .route("/import", post(orders::import))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::delete),
        )
        .route("/{id}/items/{item_id}", delete(orders::delete_item))
        .route("/{id}/confirm", post(orders::confirm))
        .route("/{id}/deliver", post(orders::deliver))
}

/// Create all protected routes (token required).
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route("/config", get(config::show).put(config::update))
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

/// Create all routes for the admin service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(protected_routes())
}
