//! Cart route handlers.
//!
//! The cart ledger lives in the visitor's session; every mutation returns
//! the refreshed cart view so the shop can re-render in one round trip.

use almacen_core::cart::CartLedger;
use almacen_core::shipping::is_arranged_destination;
use almacen_core::types::{Product, ProductCode};
use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::session_keys;
use crate::shipping::QuoteSlot;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart ledger from the session, empty if absent.
pub async fn load_ledger(session: &Session) -> Result<CartLedger> {
    Ok(session
        .get::<CartLedger>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the cart ledger into the session.
pub async fn save_ledger(session: &Session, ledger: &CartLedger) -> Result<()> {
    session.insert(session_keys::CART, ledger).await?;
    Ok(())
}

/// Load the shipping-quote slot from the session, fresh if absent.
pub async fn load_quote_slot(session: &Session) -> Result<QuoteSlot> {
    Ok(session
        .get::<QuoteSlot>(session_keys::QUOTE_SLOT)
        .await?
        .unwrap_or_default())
}

/// Persist the shipping-quote slot into the session.
pub async fn save_quote_slot(session: &Session, slot: &QuoteSlot) -> Result<()> {
    session.insert(session_keys::QUOTE_SLOT, slot).await?;
    Ok(())
}

// =============================================================================
// Views
// =============================================================================

/// One cart line, priced.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub code: ProductCode,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_subtotal: Decimal,
    pub image_url: Option<String>,
}

/// The full cart state the shop renders from.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: Decimal,
    pub item_count: u32,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    /// Subtotal still under the configured minimum order.
    pub below_minimum: bool,
    pub minimum_order: Decimal,
}

/// Price the ledger against the catalog; codes missing from the catalog
/// render nothing and contribute nothing.
fn build_view(
    ledger: &CartLedger,
    catalog: &[Product],
    shipping_fee: Decimal,
    minimum_order: Decimal,
) -> CartView {
    let lines: Vec<CartLineView> = ledger
        .iter()
        .filter_map(|(code, quantity)| {
            catalog
                .iter()
                .find(|product| &product.code == code)
                .map(|product| CartLineView {
                    code: code.clone(),
                    name: product.name.clone(),
                    quantity,
                    unit_price: product.price,
                    line_subtotal: product.price * Decimal::from(quantity),
                    image_url: product.image_url.clone(),
                })
        })
        .collect();

    let subtotal = ledger.subtotal(catalog);
    CartView {
        subtotal,
        item_count: ledger.item_count(),
        shipping_fee,
        total: subtotal + shipping_fee,
        below_minimum: subtotal < minimum_order,
        minimum_order,
        lines,
    }
}

async fn view_for(state: &AppState, session: &Session, ledger: &CartLedger) -> Result<CartView> {
    let catalog = state.catalog().await?;
    let config = state.shop_config().await?;
    let slot = load_quote_slot(session).await?;
    Ok(build_view(ledger, &catalog, slot.fee(), config.minimum_order))
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart mutation payload.
#[derive(Debug, Deserialize)]
pub struct CartChange {
    pub code: String,
    /// Signed quantity delta; only `update` reads it.
    #[serde(default)]
    pub delta: Option<i32>,
}

fn parse_code(raw: &str) -> Result<ProductCode> {
    ProductCode::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Current cart state.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let ledger = load_ledger(&session).await?;
    Ok(Json(view_for(&state, &session, &ledger).await?))
}

/// Add one unit of a product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(change): Json<CartChange>,
) -> Result<Json<CartView>> {
    let code = parse_code(&change.code)?;

    let mut ledger = load_ledger(&session).await?;
    ledger.add(code);
    save_ledger(&session, &ledger).await?;

    Ok(Json(view_for(&state, &session, &ledger).await?))
}

/// Apply a signed quantity delta; the entry disappears at zero.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(change): Json<CartChange>,
) -> Result<Json<CartView>> {
    let code = parse_code(&change.code)?;
    let delta = change
        .delta
        .ok_or_else(|| AppError::BadRequest("missing delta".to_owned()))?;

    let mut ledger = load_ledger(&session).await?;
    ledger.adjust(&code, delta);
    save_ledger(&session, &ledger).await?;

    Ok(Json(view_for(&state, &session, &ledger).await?))
}

/// Remove a line unconditionally.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(change): Json<CartChange>,
) -> Result<Json<CartView>> {
    let code = parse_code(&change.code)?;

    let mut ledger = load_ledger(&session).await?;
    ledger.remove(&code);
    save_ledger(&session, &ledger).await?;

    Ok(Json(view_for(&state, &session, &ledger).await?))
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Item count for the cart badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let ledger = load_ledger(&session).await?;
    Ok(Json(CartCount {
        count: ledger.item_count(),
    }))
}

/// Keep the quote slot honest when the address in play is the sentinel.
#[must_use]
pub fn effective_fee(address: &str, slot: &QuoteSlot) -> Decimal {
    if is_arranged_destination(address) {
        Decimal::ZERO
    } else {
        slot.fee()
    }
}
