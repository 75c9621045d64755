//! Monthly order summaries for the admin dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Order;

/// Aggregated figures for one calendar month of deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM` month key.
    pub month: String,
    pub order_count: usize,
    pub subtotal: Decimal,
    /// Shipping charged to customers.
    pub shipping_charged: Decimal,
    /// What deliveries actually cost.
    pub shipping_cost: Decimal,
    /// `shipping_charged - shipping_cost`.
    pub shipping_margin: Decimal,
    pub total: Decimal,
}

/// Months (`YYYY-MM`, descending) that have at least one dated order.
#[must_use]
pub fn months_with_orders(orders: &[Order]) -> Vec<String> {
    let mut months: Vec<String> = orders
        .iter()
        .filter_map(|order| order.delivery_day)
        .map(|day| day.format("%Y-%m").to_string())
        .collect();
    months.sort_unstable();
    months.dedup();
    months.reverse();
    months
}

/// Aggregate orders delivered in `month` (`YYYY-MM`).
///
/// Orders without a delivery day are excluded, matching how the panel
/// groups its revenue view.
#[must_use]
pub fn monthly_summary(orders: &[Order], month: &str) -> MonthlySummary {
    let in_month: Vec<&Order> = orders
        .iter()
        .filter(|order| {
            order
                .delivery_day
                .is_some_and(|day| day.format("%Y-%m").to_string() == month)
        })
        .collect();

    let subtotal: Decimal = in_month.iter().map(|o| o.subtotal).sum();
    let shipping_charged: Decimal = in_month.iter().map(|o| o.shipping_charged).sum();
    let shipping_cost: Decimal = in_month.iter().map(|o| o.shipping_cost).sum();
    let total: Decimal = in_month.iter().map(|o| o.total).sum();

    MonthlySummary {
        month: month.to_owned(),
        order_count: in_month.len(),
        subtotal,
        shipping_charged,
        shipping_cost,
        shipping_margin: shipping_charged - shipping_cost,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::ContactDetails;

    fn order(id: i64, day: Option<(i32, u32, u32)>, subtotal: i64, charged: i64, cost: i64) -> Order {
        let subtotal = Decimal::from(subtotal);
        let charged = Decimal::from(charged);
        Order {
            id,
            contact: ContactDetails::default(),
            delivery_day: day.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            subtotal,
            shipping_charged: charged,
            shipping_cost: Decimal::from(cost),
            total: subtotal + charged,
            confirmed: true,
            delivered: false,
        }
    }

    #[test]
    fn test_monthly_summary() {
        let orders = vec![
            order(1, Some((2026, 8, 6)), 1000, 500, 300),
            order(2, Some((2026, 8, 10)), 2000, 0, 250),
            order(3, Some((2026, 7, 30)), 9999, 100, 100),
            order(4, None, 5000, 0, 0),
        ];

        let summary = monthly_summary(&orders, "2026-08");
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.subtotal, Decimal::from(3000));
        assert_eq!(summary.shipping_charged, Decimal::from(500));
        assert_eq!(summary.shipping_cost, Decimal::from(550));
        assert_eq!(summary.shipping_margin, Decimal::from(-50));
        assert_eq!(summary.total, Decimal::from(3500));
    }

    #[test]
    fn test_empty_month() {
        let summary = monthly_summary(&[], "2026-08");
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_months_with_orders_descending_dedup() {
        let orders = vec![
            order(1, Some((2026, 8, 6)), 0, 0, 0),
            order(2, Some((2026, 7, 1)), 0, 0, 0),
            order(3, Some((2026, 8, 20)), 0, 0, 0),
            order(4, None, 0, 0, 0),
        ];
        assert_eq!(months_with_orders(&orders), ["2026-08", "2026-07"]);
    }
}
