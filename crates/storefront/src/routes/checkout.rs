//! Checkout route handlers.
//!
//! Validation aggregates every failing field (the shop shows them
//! inline); a clean form becomes an order draft and a single backend
//! submission. No partial submission is possible and nothing is retried.

use almacen_core::checkout::{CheckoutForm, assemble_draft};
use almacen_core::delivery::{DeliveryOption, upcoming_options};
use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::routes::cart::{
    effective_fee, load_ledger, load_quote_slot, save_ledger, save_quote_slot,
};
use crate::state::AppState;

/// How many delivery dates the form offers.
const DELIVERY_OPTION_COUNT: usize = 2;

/// Upcoming delivery dates from the configured weekdays and cutoffs.
#[instrument(skip(state))]
pub async fn delivery_days(State(state): State<AppState>) -> Result<Json<Vec<DeliveryOption>>> {
    let config = state.shop_config().await?;
    let now = chrono::Local::now().naive_local();
    Ok(Json(upcoming_options(
        &config.delivery_days,
        now,
        DELIVERY_OPTION_COUNT,
    )))
}

/// Checkout submission payload.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Whether the address came back verified from the geocoder.
    #[serde(default)]
    pub address_verified: bool,
    pub comment: String,
    pub delivery_day: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: i64,
}

/// Validate, assemble the draft, submit it, and clear the session cart.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let catalog = state.catalog().await?;
    let config = state.shop_config().await?;

    let ledger = load_ledger(&session).await?;
    let slot = load_quote_slot(&session).await?;

    let form = CheckoutForm {
        full_name: request.full_name,
        email: request.email,
        phone: request.phone,
        address: request.address,
        address_verified: request.address_verified,
        comment: request.comment,
        delivery_day: request.delivery_day,
    };

    let shipping_fee = effective_fee(&form.address, &slot);
    let draft = assemble_draft(&form, &ledger, &catalog, config.minimum_order, shipping_fee)
        .map_err(AppError::Validation)?;

    let created = state.api().create_order(&draft).await?;
    info!(order_id = created.id, "order submitted");

    // Successful submission clears the cart and the applied quote.
    let mut ledger = ledger;
    ledger.clear();
    save_ledger(&session, &ledger).await?;

    let mut slot = slot;
    slot.reset();
    save_quote_slot(&session, &slot).await?;

    Ok(Json(CheckoutResponse {
        order_id: created.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_request_deserializes_without_flag() {
        let request: CheckoutRequest = serde_json::from_str(
            r#"{
                "full_name": "Ana Gomez",
                "email": "ana@example.com",
                "phone": "1150000000",
                "address": "A ACORDAR",
                "comment": "-",
                "delivery_day": "2026-08-10"
            }"#,
        )
        .expect("payload should deserialize");
        assert!(!request.address_verified);
        assert_eq!(
            request.delivery_day,
            NaiveDate::from_ymd_opt(2026, 8, 10)
        );
    }
}
