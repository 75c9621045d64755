//! Shop configuration route handlers.
//!
//! Shipping tiers, delivery days, category ordering, and the minimum
//! order amount. Edits are validated before being persisted to the
//! backend.

use almacen_core::types::ShopConfig;
use axum::{Extension, Json, extract::State, http::StatusCode};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::middleware::AuthToken;
use crate::state::AppState;

/// Current shop configuration.
#[instrument(skip(state, token))]
pub async fn show(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<ShopConfig>> {
    Ok(Json(state.api().shop_config(token.as_str()).await?))
}

/// Validate and persist an edited configuration.
#[instrument(skip(state, token, config))]
pub async fn update(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Json(config): Json<ShopConfig>,
) -> Result<StatusCode> {
    config
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .api()
        .put_shop_config(token.as_str(), &config)
        .await?;

    info!(
        tiers = config.shipping_tiers.len(),
        delivery_days = config.delivery_days.len(),
        "shop configuration updated"
    );
    Ok(StatusCode::NO_CONTENT)
}
