//! Application state shared across handlers.
//!
//! The explicit session/application context: backend client, shipping
//! estimator, and short-lived caches for the catalog and the shop
//! configuration. Handlers receive this instead of reaching for globals,
//! which keeps the business logic testable away from HTTP.

use std::sync::Arc;
use std::time::Duration;

use almacen_core::catalog::products_from_csv;
use almacen_core::types::{Product, ShopConfig};
use moka::future::Cache;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::distance::HttpDistanceClient;
use crate::shipping::ShippingEstimator;

/// Catalog and configuration cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend client, the shipping estimator, and cached shop data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    estimator: ShippingEstimator,
    catalog_cache: Cache<&'static str, Arc<Vec<Product>>>,
    config_cache: Cache<&'static str, ShopConfig>,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = ApiClient::new(&config.api_base_url);
        let lookup = Arc::new(HttpDistanceClient::new(config.distance.clone()));
        let estimator = ShippingEstimator::new(config.distance.origin_address.clone(), lookup);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                estimator,
                catalog_cache: Cache::builder()
                    .max_capacity(4)
                    .time_to_live(CACHE_TTL)
                    .build(),
                config_cache: Cache::builder()
                    .max_capacity(4)
                    .time_to_live(CACHE_TTL)
                    .build(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the shipping estimator.
    #[must_use]
    pub fn estimator(&self) -> &ShippingEstimator {
        &self.inner.estimator
    }

    /// The enabled catalog, cached for five minutes.
    ///
    /// Comes from the backend API, or from the published CSV feed when
    /// `CATALOG_FEED_URL` is configured (wholesale mode).
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog source is unreachable or its
    /// payload does not parse.
    pub async fn catalog(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        let state = self.clone();
        self.inner
            .catalog_cache
            .try_get_with("catalog", async move { state.load_catalog().await })
            .await
            .map_err(unwrap_cached_error)
    }

    async fn load_catalog(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        let products = match &self.inner.config.catalog_feed_url {
            Some(feed_url) => {
                let text = self.inner.api.fetch_catalog_feed(feed_url).await?;
                products_from_csv(&text)
                    .map_err(|e| ApiError::Contract(format!("catalog feed: {e}")))?
                    .into_iter()
                    .filter(|product| product.enabled)
                    .collect()
            }
            None => self.inner.api.enabled_products().await?,
        };
        Ok(Arc::new(products))
    }

    /// The shop configuration, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable.
    pub async fn shop_config(&self) -> Result<ShopConfig, ApiError> {
        let api = self.inner.api.clone();
        self.inner
            .config_cache
            .try_get_with("config", async move { api.shop_config().await })
            .await
            .map_err(unwrap_cached_error)
    }
}

/// moka wraps loader errors in `Arc`; unwrap to a plain `ApiError` for
/// callers, degrading to `Contract` when the error is still shared.
fn unwrap_cached_error(error: Arc<ApiError>) -> ApiError {
    Arc::try_unwrap(error).unwrap_or_else(|shared| ApiError::Contract(shared.to_string()))
}
