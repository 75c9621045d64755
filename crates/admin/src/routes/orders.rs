//! Order management route handlers.
//!
//! Listing filters and the monthly summary are pure and tested here; the
//! mutations are thin passes over the backend client, which recomputes
//! totals server-side whenever lines change.

use almacen_core::reporting::{MonthlySummary, monthly_summary, months_with_orders};
use almacen_core::types::{Order, OrderItem, OrderStatus};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::{ImportReport, OrderCreateWire, OrderItemWire, OrderUpdateWire};
use crate::error::{AppError, Result};
use crate::middleware::AuthToken;
use crate::routes::products::read_upload;
use crate::state::AppState;

// =============================================================================
// Listing
// =============================================================================

/// Sort direction for the delivery-day ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Listing filters, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilters {
    /// Substring over name, email and address.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// `YYYY-MM` month of the delivery day.
    #[serde(default)]
    pub month: Option<String>,
    /// Exact delivery day.
    #[serde(default)]
    pub delivery_day: Option<NaiveDate>,
    #[serde(default)]
    pub sort: SortDirection,
}

/// Apply filters and the delivery-day sort.
#[must_use]
pub fn filter_orders(orders: Vec<Order>, filters: &OrderFilters) -> Vec<Order> {
    let query = filters
        .q
        .as_deref()
        .map(str::to_lowercase)
        .filter(|q| !q.is_empty());

    let mut filtered: Vec<Order> = orders
        .into_iter()
        .filter(|order| {
            if let Some(q) = &query {
                let haystack = format!(
                    "{} {} {}",
                    order.contact.full_name, order.contact.email, order.contact.address
                )
                .to_lowercase();
                if !haystack.contains(q) {
                    return false;
                }
            }

            if let Some(status) = filters.status {
                if order.status() != status {
                    return false;
                }
            }

            if let Some(month) = &filters.month {
                let order_month = order
                    .delivery_day
                    .map(|day| day.format("%Y-%m").to_string());
                if order_month.as_deref() != Some(month.as_str()) {
                    return false;
                }
            }

            if let Some(day) = filters.delivery_day {
                if order.delivery_day != Some(day) {
                    return false;
                }
            }

            true
        })
        .collect();

    // Undated orders sort to the old end, like an all-zero date would.
    filtered.sort_by(|a, b| {
        let da = a.delivery_day.unwrap_or(NaiveDate::MIN);
        let db = b.delivery_day.unwrap_or(NaiveDate::MIN);
        match filters.sort {
            SortDirection::Asc => da.cmp(&db),
            SortDirection::Desc => db.cmp(&da),
        }
    });

    filtered
}

/// Filtered, sorted order list.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Query(filters): Query<OrderFilters>,
) -> Result<Json<Vec<Order>>> {
    let orders = state.api().orders(token.as_str()).await?;
    Ok(Json(filter_orders(orders, &filters)))
}

// =============================================================================
// Summary
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub month: String,
}

/// Monthly revenue summary.
#[instrument(skip(state, token))]
pub async fn summary(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<MonthlySummary>> {
    let orders = state.api().orders(token.as_str()).await?;
    Ok(Json(monthly_summary(&orders, &params.month)))
}

/// Months that have orders, newest first (for the month selector).
#[instrument(skip(state, token))]
pub async fn summary_months(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Vec<String>>> {
    let orders = state.api().orders(token.as_str()).await?;
    Ok(Json(months_with_orders(&orders)))
}

// =============================================================================
// Detail & mutations
// =============================================================================

/// An order with its lines.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One order with lines.
#[instrument(skip(state, token))]
pub async fn show(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderDetail>> {
    let (order, items) = state.api().order(token.as_str(), order_id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// An order line in a create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl From<&ItemRequest> for OrderItemWire {
    fn from(item: &ItemRequest) -> Self {
        Self {
            id: item.id,
            codigo: item.code.clone(),
            nombre: item.name.clone(),
            cantidad: item.quantity,
            precio_unitario: item.unit_price,
            subtotal: Decimal::from(item.quantity) * item.unit_price,
        }
    }
}

/// Manual order creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub delivery_day: Option<NaiveDate>,
    #[serde(default)]
    pub shipping_charged: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub items: Vec<ItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub order_id: i64,
}

/// Create a manual order.
#[instrument(skip(state, token, request), fields(email = %request.email))]
pub async fn create(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreatedResponse>> {
    if request.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("full_name is required".to_owned()));
    }

    let payload = OrderCreateWire {
        nombre_completo: request.full_name,
        correo: request.email,
        telefono: request.phone,
        direccion: request.address,
        comentario: request.comment,
        dia_entrega: request.delivery_day,
        envio_cobrado: request.shipping_charged,
        costo_envio_real: request.shipping_cost,
        confirmado: request.confirmed,
        entregado: request.delivered,
        productos: request.items.iter().map(OrderItemWire::from).collect(),
    };

    let order_id = state.api().create_order(token.as_str(), &payload).await?;
    Ok(Json(CreatedResponse { order_id }))
}

/// Partial order update payload; absent fields keep their values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub delivery_day: Option<NaiveDate>,
    pub shipping_charged: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub confirmed: Option<bool>,
    pub delivered: Option<bool>,
    /// Replaces the whole line set when present.
    pub items: Option<Vec<ItemRequest>>,
}

/// Patch an order.
#[instrument(skip(state, token, request))]
pub async fn update(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(order_id): Path<i64>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<StatusCode> {
    let changes = OrderUpdateWire {
        nombre_completo: request.full_name,
        correo: request.email,
        telefono: request.phone,
        direccion: request.address,
        comentario: request.comment,
        dia_entrega: request.delivery_day,
        envio_cobrado: request.shipping_charged,
        costo_envio_real: request.shipping_cost,
        confirmado: request.confirmed,
        entregado: request.delivered,
        items: request
            .items
            .map(|items| items.iter().map(OrderItemWire::from).collect()),
    };

    state
        .api()
        .update_order(token.as_str(), order_id, &changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an order.
#[instrument(skip(state, token))]
pub async fn delete(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(order_id): Path<i64>,
) -> Result<StatusCode> {
    state.api().delete_order(token.as_str(), order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one line from an order.
#[instrument(skip(state, token))]
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path((order_id, item_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    state
        .api()
        .delete_order_item(token.as_str(), order_id, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub value: bool,
}

/// Toggle the confirmed flag.
#[instrument(skip(state, token))]
pub async fn confirm(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(order_id): Path<i64>,
    Json(request): Json<ToggleRequest>,
) -> Result<StatusCode> {
    let changes = OrderUpdateWire {
        confirmado: Some(request.value),
        ..OrderUpdateWire::default()
    };
    state
        .api()
        .update_order(token.as_str(), order_id, &changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the delivered flag.
#[instrument(skip(state, token))]
pub async fn deliver(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(order_id): Path<i64>,
    Json(request): Json<ToggleRequest>,
) -> Result<StatusCode> {
    let changes = OrderUpdateWire {
        entregado: Some(request.value),
        ..OrderUpdateWire::default()
    };
    state
        .api()
        .update_order(token.as_str(), order_id, &changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Forward an order sheet (Excel) to the backend importer.
#[instrument(skip(state, token, multipart))]
pub async fn import(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    multipart: Multipart,
) -> Result<Json<ImportReport>> {
    let (filename, bytes) = read_upload(multipart).await?;
    let report = state
        .api()
        .import_orders(token.as_str(), &filename, bytes)
        .await?;
    Ok(Json(report))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use almacen_core::types::ContactDetails;

    use super::*;

    fn order(id: i64, name: &str, day: Option<(i32, u32, u32)>, confirmed: bool, delivered: bool) -> Order {
        Order {
            id,
            contact: ContactDetails {
                full_name: name.to_owned(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                phone: String::new(),
                address: "Ibera 3852".to_owned(),
                comment: String::new(),
            },
            delivery_day: day.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            subtotal: Decimal::ZERO,
            shipping_charged: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            total: Decimal::ZERO,
            confirmed,
            delivered,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order(1, "Ana Gomez", Some((2026, 8, 6)), false, false),
            order(2, "Bruno Diaz", Some((2026, 8, 10)), true, false),
            order(3, "Carla Paz", Some((2026, 7, 30)), true, true),
            order(4, "Diego Sosa", None, false, false),
        ]
    }

    #[test]
    fn test_filter_by_query_matches_name_email_address() {
        let filters = OrderFilters {
            q: Some("bruno".to_owned()),
            ..OrderFilters::default()
        };
        let result = filter_orders(sample(), &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);

        let filters = OrderFilters {
            q: Some("ibera".to_owned()),
            ..OrderFilters::default()
        };
        assert_eq!(filter_orders(sample(), &filters).len(), 4);
    }

    #[test]
    fn test_filter_by_status() {
        let filters = OrderFilters {
            status: Some(OrderStatus::Pending),
            ..OrderFilters::default()
        };
        let ids: Vec<i64> = filter_orders(sample(), &filters).iter().map(|o| o.id).collect();
        assert_eq!(ids, [1, 4]);

        let filters = OrderFilters {
            status: Some(OrderStatus::Delivered),
            ..OrderFilters::default()
        };
        let ids: Vec<i64> = filter_orders(sample(), &filters).iter().map(|o| o.id).collect();
        assert_eq!(ids, [3]);
    }

    #[test]
    fn test_filter_by_month_excludes_undated() {
        let filters = OrderFilters {
            month: Some("2026-08".to_owned()),
            ..OrderFilters::default()
        };
        let ids: Vec<i64> = filter_orders(sample(), &filters).iter().map(|o| o.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn test_sort_directions() {
        let filters = OrderFilters {
            sort: SortDirection::Asc,
            ..OrderFilters::default()
        };
        let ids: Vec<i64> = filter_orders(sample(), &filters).iter().map(|o| o.id).collect();
        // Undated sorts oldest in ascending order.
        assert_eq!(ids, [4, 3, 1, 2]);

        let filters = OrderFilters::default();
        let ids: Vec<i64> = filter_orders(sample(), &filters).iter().map(|o| o.id).collect();
        assert_eq!(ids, [2, 1, 3, 4]);
    }

    #[test]
    fn test_item_request_computes_subtotal() {
        let item = ItemRequest {
            id: None,
            code: "P1".to_owned(),
            name: "Pan".to_owned(),
            quantity: 3,
            unit_price: Decimal::from(250),
        };
        let wire = OrderItemWire::from(&item);
        assert_eq!(wire.subtotal, Decimal::from(750));
    }
}
