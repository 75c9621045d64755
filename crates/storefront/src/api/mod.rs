//! Backend commerce API client.
//!
//! All persistent state (products, orders, configuration) lives behind
//! the backend REST API; this client is the storefront's only write path.
//! Requests are JSON, no retries are attempted, and non-success statuses
//! surface the backend's own message so the caller can alert with it.

pub mod types;

use almacen_core::types::{OrderDraft, Product, ShopConfig};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

pub use types::CreatedOrder;
use types::{OrderDraftWire, ProductWire, convert_product};

/// Errors from the backend API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or transport-level failure.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status; carries the backend's message.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not the JSON we expected.
    #[error("could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but violated the response contract.
    #[error("backend contract violation: {0}")]
    Contract(String),
}

/// Client for the backend commerce API (public endpoints).
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the given API base URL.
    #[must_use]
    pub fn new(base_url: &url::Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Read the body, mapping non-success statuses to [`ApiError::Status`].
    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List the products enabled for the public shop, already converted.
    ///
    /// Rows with unusable codes are dropped with a warning rather than
    /// failing the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn enabled_products(&self) -> Result<Vec<Product>, ApiError> {
        let rows: Vec<ProductWire> = self.get_json("products/enabled").await?;
        let total = rows.len();

        let products: Vec<Product> = rows.into_iter().filter_map(convert_product).collect();
        if products.len() < total {
            warn!(
                dropped = total - products.len(),
                "catalog rows dropped for unusable product codes"
            );
        }

        debug!(count = products.len(), "catalog loaded");
        Ok(products)
    }

    /// Fetch the shop configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn shop_config(&self) -> Result<ShopConfig, ApiError> {
        self.get_json("config/list").await
    }

    /// Submit an order draft.
    ///
    /// The backend must answer with the canonical
    /// `{ "order": { "id": ... }, ... }` shape; any other shape is a
    /// [`ApiError::Contract`] rather than a guess at alternative keys.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a
    /// non-canonical response body.
    #[instrument(skip(self, draft), fields(items = draft.items.len()))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder, ApiError> {
        let payload = OrderDraftWire::from(draft);
        let response = self
            .client
            .post(self.endpoint("orders/"))
            .json(&payload)
            .send()
            .await?;
        let body = Self::read_body(response).await?;

        let value: serde_json::Value = serde_json::from_str(&body)?;
        let id = value
            .get("order")
            .and_then(|order| order.get("id"))
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                ApiError::Contract("order creation response is missing order.id".to_owned())
            })?;

        debug!(order_id = id, "order created");
        Ok(CreatedOrder { id })
    }

    /// Fetch a published CSV catalog feed (wholesale mode).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self), fields(url = %feed_url))]
    pub async fn fetch_catalog_feed(&self, feed_url: &url::Url) -> Result<String, ApiError> {
        let response = self.client.get(feed_url.as_str()).send().await?;
        Self::read_body(response).await
    }

    /// Readiness ping: verifies the backend answers at all.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable or unhealthy.
    pub async fn ready(&self) -> Result<(), ApiError> {
        let response = self.client.get(self.endpoint("config/list")).send().await?;
        Self::read_body(response).await.map(|_| ())
    }
}
