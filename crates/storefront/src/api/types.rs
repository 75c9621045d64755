//! Wire types for the backend commerce API.
//!
//! Field names mirror the backend's JSON (Spanish, snake_case); the
//! conversion functions translate to the core domain model.

use almacen_core::types::{OrderDraft, Product, ProductCode};
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
    #[serde(default = "default_enabled")]
    pub habilitado: bool,
    #[serde(default)]
    pub orden: Option<u32>,
    #[serde(default)]
    pub imagen_url: Option<String>,
}

const fn default_enabled() -> bool {
    true
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

/// An order line in the creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemWire {
    pub codigo: String,
    pub nombre: String,
    pub cantidad: u32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

/// The order-creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraftWire {
    pub nombre_completo: String,
    pub correo: String,
    pub telefono: String,
    pub direccion: String,
    pub comentario: String,
    pub dia_entrega: Option<NaiveDate>,
    pub envio_cobrado: Decimal,
    pub confirmado: bool,
    pub entregado: bool,
    pub productos: Vec<OrderItemWire>,
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl From<&OrderDraft> for OrderDraftWire {
    fn from(draft: &OrderDraft) -> Self {
        Self {
            nombre_completo: draft.contact.full_name.clone(),
            correo: draft.contact.email.clone(),
            telefono: draft.contact.phone.clone(),
            direccion: draft.contact.address.clone(),
            comentario: draft.contact.comment.clone(),
            dia_entrega: draft.delivery_day,
            envio_cobrado: draft.shipping_fee,
            confirmado: draft.confirmed,
            entregado: draft.delivered,
            productos: draft
                .items
                .iter()
                .map(|item| OrderItemWire {
                    codigo: item.code.as_str().to_owned(),
                    nombre: item.name.clone(),
                    cantidad: item.quantity,
                    precio_unitario: item.unit_price,
                    subtotal: item.subtotal,
                })
                .collect(),
            subtotal: draft.subtotal,
            total: draft.total,
        }
    }
}

/// The canonical order-creation result.
///
/// The backend responds `{ "order": { "id": ... , ... }, "productos":
/// [...] }`; anything else is treated as a contract violation rather than
/// probed for alternative key spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: i64,
}
