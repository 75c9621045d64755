//! Order types.
//!
//! An [`OrderDraft`] is the pure output of checkout: contact details plus a
//! snapshot of the cart priced at draft time. The backend owns persisted
//! [`Order`]s; both services only ever read or patch them over the API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::ProductCode;

/// A single order line.
///
/// Name and unit price are snapshotted from the catalog when the line is
/// created so later price changes do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Backend row id; `None` for lines that have not been persisted yet.
    pub id: Option<i64>,
    pub code: ProductCode,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// `quantity x unit_price`, fixed at construction.
    pub subtotal: Decimal,
}

impl OrderItem {
    /// Create a line, computing its subtotal.
    #[must_use]
    pub fn new(code: ProductCode, name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            id: None,
            code,
            name: name.into(),
            quantity,
            unit_price,
            subtotal: Decimal::from(quantity) * unit_price,
        }
    }
}

/// Customer contact fields collected at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub comment: String,
}

/// The wire-ready order draft produced by checkout.
///
/// Invariant: `total = subtotal + shipping_fee`, where `subtotal` is the
/// sum of the item subtotals. [`OrderDraft::new`] holds this by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    pub contact: ContactDetails,
    pub delivery_day: Option<NaiveDate>,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub confirmed: bool,
    pub delivered: bool,
}

impl OrderDraft {
    /// Assemble a draft from priced lines.
    ///
    /// New drafts always start unconfirmed and undelivered.
    #[must_use]
    pub fn new(
        contact: ContactDetails,
        delivery_day: Option<NaiveDate>,
        items: Vec<OrderItem>,
        shipping_fee: Decimal,
    ) -> Self {
        let subtotal: Decimal = items.iter().map(|item| item.subtotal).sum();
        Self {
            contact,
            delivery_day,
            items,
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
            confirmed: false,
            delivered: false,
        }
    }
}

/// Lifecycle state of a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// A persisted order as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub contact: ContactDetails,
    pub delivery_day: Option<NaiveDate>,
    pub subtotal: Decimal,
    /// Shipping fee charged to the customer.
    pub shipping_charged: Decimal,
    /// What the delivery actually cost the shop.
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub confirmed: bool,
    pub delivered: bool,
}

impl Order {
    /// Current status; delivery wins over confirmation.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        if self.delivered {
            OrderStatus::Delivered
        } else if self.confirmed {
            OrderStatus::Confirmed
        } else {
            OrderStatus::Pending
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        ProductCode::parse(s).unwrap()
    }

    #[test]
    fn test_item_subtotal() {
        let item = OrderItem::new(code("A"), "Pan", 3, Decimal::from(250));
        assert_eq!(item.subtotal, Decimal::from(750));
    }

    #[test]
    fn test_draft_total_invariant() {
        let items = vec![
            OrderItem::new(code("A"), "Pan", 2, Decimal::from(100)),
            OrderItem::new(code("B"), "Miel", 1, Decimal::from(350)),
        ];
        let draft = OrderDraft::new(ContactDetails::default(), None, items, Decimal::from(500));

        assert_eq!(draft.subtotal, Decimal::from(550));
        assert_eq!(draft.total, draft.subtotal + draft.shipping_fee);
        assert!(!draft.confirmed);
        assert!(!draft.delivered);
    }

    #[test]
    fn test_empty_draft_total_is_fee() {
        let draft = OrderDraft::new(ContactDetails::default(), None, vec![], Decimal::ZERO);
        assert_eq!(draft.subtotal, Decimal::ZERO);
        assert_eq!(draft.total, Decimal::ZERO);
    }

    #[test]
    fn test_order_status_precedence() {
        let mut order = Order {
            id: 1,
            contact: ContactDetails::default(),
            delivery_day: None,
            subtotal: Decimal::ZERO,
            shipping_charged: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            total: Decimal::ZERO,
            confirmed: false,
            delivered: false,
        };
        assert_eq!(order.status(), OrderStatus::Pending);

        order.confirmed = true;
        assert_eq!(order.status(), OrderStatus::Confirmed);

        order.delivered = true;
        assert_eq!(order.status(), OrderStatus::Delivered);
    }
}
