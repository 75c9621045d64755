//! Backend commerce API client (admin endpoints).
//!
//! Every mutating call authenticates with the operator's bearer token in
//! the `x-api-key` header; tokens are issued by the backend's login
//! endpoint and live in the operator's session, never in this process's
//! configuration. JSON in, JSON out, file uploads as multipart, no
//! retries; a no-content status is success with an empty body.

pub mod types;

use almacen_core::types::{Order, OrderItem, Product, ShopConfig};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

pub use types::{ImportReport, OrderCreateWire, OrderItemWire, OrderUpdateWire};
use types::{LoginResponse, OrderDetailWire, OrderWire, ProductWire, convert_item, convert_order, convert_product};

/// Errors from the backend API boundary.
#[derive(Debug, thiserror::Error)]
pub enum AdminApiError {
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

impl AdminApiError {
    /// Whether the backend rejected the operator's token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

/// Client for the backend commerce API (admin endpoints).
#[derive(Clone)]
pub struct AdminApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AdminApiClient {
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

    fn authed(&self, method: reqwest::Method, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint(path))
            .header("x-api-key", token)
    }

    /// Read the body, mapping non-success statuses to
    /// [`AdminApiError::Status`]. No-content successes yield an empty
    /// string.
    async fn read_body(response: reqwest::Response) -> Result<String, AdminApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(AdminApiError::Status {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, AdminApiError> {
        let body = Self::read_body(request.send().await?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send and ignore the body; tolerates no-content responses.
    async fn send_ok(request: reqwest::RequestBuilder) -> Result<(), AdminApiError> {
        Self::read_body(request.send().await?).await.map(|_| ())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange form-encoded credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `Status` with the backend's message on bad credentials.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AdminApiError> {
        let request = self
            .client
            .post(self.endpoint("login/auth/"))
            .form(&[("username", username), ("password", password)]);
        let response: LoginResponse = Self::send_json(request).await?;
        Ok(response.access_token)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Full product list (enabled and disabled), converted.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self, token))]
    pub async fn products(&self, token: &str) -> Result<Vec<Product>, AdminApiError> {
        let rows: Vec<ProductWire> =
            Self::send_json(self.authed(reqwest::Method::GET, "products/", token)).await?;
        let total = rows.len();

        let products: Vec<Product> = rows.into_iter().filter_map(convert_product).collect();
        if products.len() < total {
            warn!(
                dropped = total - products.len(),
                "product rows dropped for unusable codes"
            );
        }
        Ok(products)
    }

    /// Backend typeahead search.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token))]
    pub async fn search_products(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Product>, AdminApiError> {
        let request = self
            .authed(reqwest::Method::GET, "products/search", token)
            .query(&[("q", query), ("limit", &limit.to_string())]);
        let rows: Vec<ProductWire> = Self::send_json(request).await?;
        Ok(rows.into_iter().filter_map(convert_product).collect())
    }

    /// Persist one product's display rank.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token))]
    pub async fn set_product_rank(
        &self,
        token: &str,
        product_id: i64,
        rank: u32,
    ) -> Result<(), AdminApiError> {
        let request = self
            .authed(
                reqwest::Method::PUT,
                &format!("products/{product_id}/order"),
                token,
            )
            .json(&serde_json::json!({ "orden": rank }));
        Self::send_ok(request).await
    }

    /// Enable or disable a product in the public shop.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token))]
    pub async fn set_product_enabled(
        &self,
        token: &str,
        product_id: i64,
        enabled: bool,
    ) -> Result<(), AdminApiError> {
        let request = self
            .authed(
                reqwest::Method::PUT,
                &format!("products/{product_id}/state"),
                token,
            )
            .json(&serde_json::json!({ "habilitado": enabled }));
        Self::send_ok(request).await
    }

    /// Upload a product image (multipart).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token, bytes), fields(code = %code, size = bytes.len()))]
    pub async fn upload_product_image(
        &self,
        token: &str,
        code: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AdminApiError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_owned());
        let form = multipart::Form::new().part("file", part);
        let request = self
            .authed(
                reqwest::Method::POST,
                &format!("images/upload/{code}/"),
                token,
            )
            .multipart(form);
        Self::send_ok(request).await
    }

    /// Delete a product image by its backend path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token))]
    pub async fn delete_product_image(
        &self,
        token: &str,
        image_path: &str,
    ) -> Result<(), AdminApiError> {
        let path = image_path.trim_start_matches('/');
        Self::send_ok(self.authed(reqwest::Method::DELETE, path, token)).await
    }

    /// Forward a product sheet (Excel) for the backend to import.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    pub async fn import_products(
        &self,
        token: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportReport, AdminApiError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_owned());
        let form = multipart::Form::new().part("file", part);
        let request = self
            .authed(reqwest::Method::POST, "products/import", token)
            .multipart(form);
        Self::send_json(request).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Full order list, converted.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &str) -> Result<Vec<Order>, AdminApiError> {
        let rows: Vec<OrderWire> =
            Self::send_json(self.authed(reqwest::Method::GET, "orders/", token)).await?;
        Ok(rows.into_iter().map(convert_order).collect())
    }

    /// One order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self, token))]
    pub async fn order(
        &self,
        token: &str,
        order_id: i64,
    ) -> Result<(Order, Vec<OrderItem>), AdminApiError> {
        let detail: OrderDetailWire = Self::send_json(self.authed(
            reqwest::Method::GET,
            &format!("orders/{order_id}"),
            token,
        ))
        .await?;
        let items = detail.productos.into_iter().map(convert_item).collect();
        Ok((convert_order(detail.order), items))
    }

    /// Create a manual order.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a
    /// non-canonical response body.
    #[instrument(skip(self, token, payload), fields(items = payload.productos.len()))]
    pub async fn create_order(
        &self,
        token: &str,
        payload: &OrderCreateWire,
    ) -> Result<i64, AdminApiError> {
        let request = self
            .authed(reqwest::Method::POST, "orders/", token)
            .json(payload);
        let value: serde_json::Value = Self::send_json(request).await?;
        value
            .get("order")
            .and_then(|order| order.get("id"))
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                AdminApiError::Contract("order creation response is missing order.id".to_owned())
            })
    }

    /// Patch an order; absent fields keep their values.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token, changes))]
    pub async fn update_order(
        &self,
        token: &str,
        order_id: i64,
        changes: &OrderUpdateWire,
    ) -> Result<(), AdminApiError> {
        let request = self
            .authed(reqwest::Method::PUT, &format!("orders/{order_id}"), token)
            .json(changes);
        Self::send_ok(request).await
    }

    /// Delete an order and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token))]
    pub async fn delete_order(&self, token: &str, order_id: i64) -> Result<(), AdminApiError> {
        Self::send_ok(self.authed(reqwest::Method::DELETE, &format!("orders/{order_id}"), token))
            .await
    }

    /// Delete one line from an order; the backend recomputes totals.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token))]
    pub async fn delete_order_item(
        &self,
        token: &str,
        order_id: i64,
        item_id: i64,
    ) -> Result<(), AdminApiError> {
        Self::send_ok(self.authed(
            reqwest::Method::DELETE,
            &format!("orders/{order_id}/items/{item_id}"),
            token,
        ))
        .await
    }

    /// Forward an order sheet (Excel) for the backend to import.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    pub async fn import_orders(
        &self,
        token: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportReport, AdminApiError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_owned());
        let form = multipart::Form::new().part("file", part);
        let request = self
            .authed(reqwest::Method::POST, "orders/import-excel", token)
            .multipart(form);
        Self::send_json(request).await
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Fetch the shop configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self, token))]
    pub async fn shop_config(&self, token: &str) -> Result<ShopConfig, AdminApiError> {
        Self::send_json(self.authed(reqwest::Method::GET, "config/list", token)).await
    }

    /// Persist the shop configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, token, config))]
    pub async fn put_shop_config(
        &self,
        token: &str,
        config: &ShopConfig,
    ) -> Result<(), AdminApiError> {
        let request = self
            .authed(reqwest::Method::PUT, "config/envio", token)
            .json(config);
        let result = Self::send_ok(request).await;
        if result.is_ok() {
            debug!("shop configuration saved");
        }
        result
    }
}
