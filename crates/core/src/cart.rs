//! The cart ledger.
//!
//! An in-memory mapping of product code to quantity. The ledger is held in
//! the visitor's session and cleared on successful checkout; all
//! operations are total functions over the mapping and stored quantities
//! are always positive.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductCode};

/// Product code to quantity mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLedger {
    lines: BTreeMap<ProductCode, u32>,
}

impl CartLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a product's quantity by one, creating the entry at 1 if
    /// absent.
    pub fn add(&mut self, code: ProductCode) {
        *self.lines.entry(code).or_insert(0) += 1;
    }

    /// Add a signed delta to a product's quantity.
    ///
    /// The entry is removed when the resulting quantity drops to zero or
    /// below. Adjusting an absent code with a non-positive delta is a
    /// no-op; a positive delta creates the entry.
    pub fn adjust(&mut self, code: &ProductCode, delta: i32) {
        let current = i64::from(self.quantity(code));
        let next = current + i64::from(delta);
        if next <= 0 {
            self.lines.remove(code);
        } else {
            // quantity saturates at u32::MAX
            let clamped = u32::try_from(next).unwrap_or(u32::MAX);
            self.lines.insert(code.clone(), clamped);
        }
    }

    /// Delete an entry unconditionally.
    pub fn remove(&mut self, code: &ProductCode) {
        self.lines.remove(code);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Current quantity for a code; 0 if absent.
    #[must_use]
    pub fn quantity(&self, code: &ProductCode) -> u32 {
        self.lines.get(code).copied().unwrap_or(0)
    }

    /// Sum of `unit price x quantity` over the entries.
    ///
    /// Codes missing from the catalog contribute nothing.
    #[must_use]
    pub fn subtotal(&self, catalog: &[Product]) -> Decimal {
        self.lines
            .iter()
            .filter_map(|(code, quantity)| {
                catalog
                    .iter()
                    .find(|product| &product.code == code)
                    .map(|product| product.price * Decimal::from(*quantity))
            })
            .sum()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Iterate entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductCode, u32)> {
        self.lines.iter().map(|(code, quantity)| (code, *quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        ProductCode::parse(s).unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(code("A"), "Pan integral", Decimal::from(250)),
            Product::new(code("B"), "Miel", Decimal::from(1200)),
        ]
    }

    #[test]
    fn test_add_creates_and_increments() {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.add(code("A"));
        assert_eq!(cart.quantity(&code("A")), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_adjust_removes_at_zero() {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.adjust(&code("A"), -1);
        assert_eq!(cart.quantity(&code("A")), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_below_zero_removes() {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.adjust(&code("A"), -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_absent_code_with_negative_delta_is_noop() {
        let mut cart = CartLedger::new();
        cart.adjust(&code("A"), -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_positive_creates_entry() {
        let mut cart = CartLedger::new();
        cart.adjust(&code("A"), 3);
        assert_eq!(cart.quantity(&code("A")), 3);
    }

    #[test]
    fn test_remove_unconditional() {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.add(code("A"));
        cart.remove(&code("A"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantities_never_non_positive() {
        // Drive an arbitrary op sequence and check the invariant throughout.
        let mut cart = CartLedger::new();
        let ops: [(&str, i32); 8] = [
            ("A", 1),
            ("A", -3),
            ("B", 2),
            ("B", -1),
            ("B", -1),
            ("C", 0),
            ("C", -2),
            ("A", 4),
        ];
        for (c, delta) in ops {
            cart.adjust(&code(c), delta);
            assert!(cart.iter().all(|(_, q)| q >= 1));
        }
    }

    #[test]
    fn test_subtotal() {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.add(code("A"));
        cart.add(code("B"));
        assert_eq!(cart.subtotal(&catalog()), Decimal::from(1700));
    }

    #[test]
    fn test_subtotal_unknown_code_contributes_zero() {
        let mut cart = CartLedger::new();
        cart.add(code("ZZZ"));
        cart.add(code("A"));
        assert_eq!(cart.subtotal(&catalog()), Decimal::from(250));
    }

    #[test]
    fn test_empty_subtotal_is_zero() {
        let cart = CartLedger::new();
        assert_eq!(cart.subtotal(&catalog()), Decimal::ZERO);
    }

    #[test]
    fn test_clear() {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
