//! Wire types for the backend commerce API (admin endpoints).
//!
//! Field names mirror the backend's JSON; conversions translate to the
//! core domain model. Lines whose code the backend never captured fall
//! back to the backend's own `GENERIC` placeholder code.

use almacen_core::types::{ContactDetails, Order, OrderItem, Product, ProductCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product row as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductWire {
    #[serde(default)]
    pub id: Option<i64>,
    pub codigo: String,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub subcategoria: Option<String>,
    #[serde(default)]
    pub precio: Decimal,
    #[serde(default)]
    pub proveedor: Option<String>,
    #[serde(default)]
    pub habilitado: bool,
    #[serde(default)]
    pub orden: Option<u32>,
    #[serde(default)]
    pub imagen_url: Option<String>,
}

/// Convert a wire product, or `None` when its code is unusable.
#[must_use]
pub fn convert_product(wire: ProductWire) -> Option<Product> {
    let code = ProductCode::parse(&wire.codigo).ok()?;
    Some(Product {
        id: wire.id,
        code,
        name: wire.nombre,
        description: wire.descripcion.unwrap_or_default(),
        category: wire.categoria.unwrap_or_default(),
        subcategory: wire.subcategoria.unwrap_or_default(),
        price: wire.precio,
        supplier: wire.proveedor.unwrap_or_default(),
        enabled: wire.habilitado,
        rank: wire.orden,
        image_url: wire.imagen_url,
    })
}

/// An order row as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderWire {
    pub id: i64,
    #[serde(default)]
    pub nombre_completo: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub comentario: String,
    #[serde(default)]
    pub dia_entrega: Option<NaiveDate>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub envio_cobrado: Decimal,
    #[serde(default)]
    pub costo_envio_real: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub confirmado: bool,
    #[serde(default)]
    pub entregado: bool,
}

/// Convert a wire order into the domain model.
#[must_use]
pub fn convert_order(wire: OrderWire) -> Order {
    Order {
        id: wire.id,
        contact: ContactDetails {
            full_name: wire.nombre_completo,
            email: wire.correo,
            phone: wire.telefono,
            address: wire.direccion,
            comment: wire.comentario,
        },
        delivery_day: wire.dia_entrega,
        subtotal: wire.subtotal,
        shipping_charged: wire.envio_cobrado,
        shipping_cost: wire.costo_envio_real,
        total: wire.total,
        confirmed: wire.confirmado,
        delivered: wire.entregado,
    }
}

/// An order line as the backend serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemWire {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default = "one")]
    pub cantidad: u32,
    #[serde(default)]
    pub precio_unitario: Decimal,
    #[serde(default)]
    pub subtotal: Decimal,
}

const fn one() -> u32 {
    1
}

/// Lines with a blank or unusable code carry the backend's own
/// placeholder.
fn item_code(raw: &str) -> ProductCode {
    ProductCode::parse(raw)
        .or_else(|_| ProductCode::parse("GENERIC"))
        .unwrap_or_else(|_| unreachable!("GENERIC is a valid product code"))
}

/// Convert a wire line into the domain model.
#[must_use]
pub fn convert_item(wire: OrderItemWire) -> OrderItem {
    let mut item = OrderItem::new(
        item_code(&wire.codigo),
        wire.nombre,
        wire.cantidad,
        wire.precio_unitario,
    );
    item.id = wire.id;
    item
}

impl From<&OrderItem> for OrderItemWire {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id,
            codigo: item.code.as_str().to_owned(),
            nombre: item.name.clone(),
            cantidad: item.quantity,
            precio_unitario: item.unit_price,
            subtotal: item.subtotal,
        }
    }
}

/// An order with its lines, as `GET /orders/{id}` answers.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetailWire {
    pub order: OrderWire,
    #[serde(default)]
    pub productos: Vec<OrderItemWire>,
}

/// Partial order update; absent fields keep their backend values.
///
/// Sending `items` replaces the whole line set and makes the backend
/// recompute totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderUpdateWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_completo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dia_entrega: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envio_cobrado: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costo_envio_real: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmado: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entregado: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemWire>>,
}

/// Order creation payload (manual orders from the panel).
///
/// The creation endpoint names its lines `productos`, unlike the update
/// endpoint's `items`; the backend recomputes totals from the lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderCreateWire {
    pub nombre_completo: String,
    pub correo: String,
    pub telefono: String,
    pub direccion: String,
    pub comentario: String,
    pub dia_entrega: Option<NaiveDate>,
    pub envio_cobrado: Decimal,
    pub costo_envio_real: Decimal,
    pub confirmado: bool,
    pub entregado: bool,
    pub productos: Vec<OrderItemWire>,
}

/// Outcome of a backend file import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub created: u32,
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Login response: the bearer token the backend issues.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_order() {
        let wire: OrderWire = serde_json::from_str(
            r#"{
                "id": 7,
                "nombre_completo": "Ana Gomez",
                "correo": "ana@example.com",
                "dia_entrega": "2026-08-10",
                "subtotal": 1700,
                "envio_cobrado": 500,
                "costo_envio_real": 350,
                "total": 2200,
                "confirmado": true,
                "entregado": false
            }"#,
        )
        .unwrap();

        let order = convert_order(wire);
        assert_eq!(order.id, 7);
        assert_eq!(order.contact.full_name, "Ana Gomez");
        assert_eq!(order.shipping_charged, Decimal::from(500));
        assert_eq!(order.total, Decimal::from(2200));
    }

    #[test]
    fn test_convert_item_blank_code_becomes_generic() {
        let wire: OrderItemWire =
            serde_json::from_str(r#"{"codigo": "", "nombre": "Suelto", "precio_unitario": 100}"#)
                .unwrap();
        let item = convert_item(wire);
        assert_eq!(item.code.as_str(), "GENERIC");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.subtotal, Decimal::from(100));
    }

    #[test]
    fn test_order_update_skips_absent_fields() {
        let update = OrderUpdateWire {
            confirmado: Some(true),
            ..OrderUpdateWire::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"confirmado": true}));
    }
}
