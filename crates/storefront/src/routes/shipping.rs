//! Shipping quote route handler.
//!
//! Quotes are requested on every address change and never cancelled, so
//! two can be in flight at once. Each request takes a ticket from the
//! session's [`QuoteSlot`] before awaiting the estimator and may only
//! store its fee if no newer ticket settled first; stale results are
//! reported back as not applied.

use almacen_core::shipping::{Severity, ShippingQuote};
use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::routes::cart::{load_quote_slot, save_quote_slot};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub destination: String,
}

/// The quote plus whether it became the session's applied fee.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub cost: Decimal,
    pub message: String,
    pub severity: Severity,
    pub distance_km: Option<Decimal>,
    /// `false` when a newer request settled while this one was in flight.
    pub applied: bool,
}

impl QuoteResponse {
    fn from_quote(quote: ShippingQuote, applied: bool) -> Self {
        Self {
            cost: quote.cost,
            message: quote.message,
            severity: quote.severity,
            distance_km: quote.distance_km,
            applied,
        }
    }
}

/// Estimate shipping to a destination and, when still current, apply it.
#[instrument(skip(state, session), fields(destination = %request.destination))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    // Take a ticket before the lookup awaits.
    let mut slot = load_quote_slot(&session).await?;
    let ticket = slot.issue();
    save_quote_slot(&session, &slot).await?;

    let config = state.shop_config().await?;
    let quote = state
        .estimator()
        .estimate(&request.destination, &config.shipping_tiers)
        .await;

    // Re-read: another request may have settled while we awaited.
    let mut slot = load_quote_slot(&session).await?;
    let applied = slot.apply(ticket, quote.cost);
    if applied {
        save_quote_slot(&session, &slot).await?;
    }

    Ok(Json(QuoteResponse::from_quote(quote, applied)))
}
