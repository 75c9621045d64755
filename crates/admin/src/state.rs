//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::AdminApiClient;
use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the backend admin client. Operator tokens are NOT
/// here; they live per-session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: AdminApiClient,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let api = AdminApiClient::new(&config.api_base_url);
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the backend admin client.
    #[must_use]
    pub fn api(&self) -> &AdminApiClient {
        &self.inner.api
    }
}
