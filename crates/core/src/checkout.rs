//! Checkout validation and order-draft assembly.
//!
//! Field checks mirror the shop's form contract: simple presence and shape
//! tests, aggregated so every failing field can be reported inline. The
//! assembler is a pure transform from ledger + catalog + contact fields to
//! the wire-ready draft; submission is the caller's concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLedger;
use crate::shipping::is_arranged_destination;
use crate::types::{ContactDetails, OrderDraft, OrderItem, Product, ProductCode};

/// Checkout form state as collected from the visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Set when the address came back verified from the geocoder. The
    /// arrangement sentinel passes validation without it.
    #[serde(default)]
    pub address_verified: bool,
    pub comment: String,
    pub delivery_day: Option<chrono::NaiveDate>,
}

/// Per-field validation failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum CheckoutError {
    #[error("ingrese su nombre completo")]
    FullName,
    #[error("ingrese un mail valido")]
    Email,
    #[error("ingrese un telefono valido")]
    Phone,
    #[error("seleccione una direccion valida")]
    Address,
    #[error("seleccione un dia de entrega")]
    DeliveryDay,
    #[error("ingrese un comentario")]
    Comment,
    #[error("agregue productos al carrito")]
    EmptyCart,
    #[error("el pedido minimo es de ${minimum}")]
    BelowMinimum { minimum: Decimal },
    #[error("producto desconocido en el carrito: {code}")]
    UnknownProduct { code: ProductCode },
}

/// Validate the whole checkout, returning every failure found.
///
/// An empty vector means the submit action may proceed; no partial
/// submission is possible.
#[must_use]
pub fn validate(
    form: &CheckoutForm,
    ledger: &CartLedger,
    catalog: &[Product],
    minimum_order: Decimal,
) -> Vec<CheckoutError> {
    let mut errors = Vec::new();

    // Full name must contain at least a first and last part.
    let name = form.full_name.trim();
    if name.is_empty() || !name.contains(' ') {
        errors.push(CheckoutError::FullName);
    }

    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        errors.push(CheckoutError::Email);
    }

    if form.phone.trim().len() < 8 {
        errors.push(CheckoutError::Phone);
    }

    if !form.address_verified && !is_arranged_destination(&form.address) {
        errors.push(CheckoutError::Address);
    }

    if form.delivery_day.is_none() {
        errors.push(CheckoutError::DeliveryDay);
    }

    if form.comment.trim().is_empty() {
        errors.push(CheckoutError::Comment);
    }

    if ledger.is_empty() {
        errors.push(CheckoutError::EmptyCart);
    } else {
        for (code, _) in ledger.iter() {
            if !catalog.iter().any(|product| &product.code == code) {
                errors.push(CheckoutError::UnknownProduct { code: code.clone() });
            }
        }

        let subtotal = ledger.subtotal(catalog);
        if subtotal < minimum_order {
            errors.push(CheckoutError::BelowMinimum {
                minimum: minimum_order,
            });
        }
    }

    errors
}

/// Validate and assemble the order draft.
///
/// Line items snapshot name and unit price from the catalog in ledger
/// (code) order. The draft's total invariant holds by construction.
///
/// # Errors
///
/// Returns the full list of validation failures when any check fails.
pub fn assemble_draft(
    form: &CheckoutForm,
    ledger: &CartLedger,
    catalog: &[Product],
    minimum_order: Decimal,
    shipping_fee: Decimal,
) -> Result<OrderDraft, Vec<CheckoutError>> {
    let errors = validate(form, ledger, catalog, minimum_order);
    if !errors.is_empty() {
        return Err(errors);
    }

    let items: Vec<OrderItem> = ledger
        .iter()
        .filter_map(|(code, quantity)| {
            catalog
                .iter()
                .find(|product| &product.code == code)
                .map(|product| {
                    OrderItem::new(code.clone(), product.name.clone(), quantity, product.price)
                })
        })
        .collect();

    let contact = ContactDetails {
        full_name: form.full_name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        phone: form.phone.trim().to_owned(),
        address: form.address.trim().to_owned(),
        comment: form.comment.trim().to_owned(),
    };

    Ok(OrderDraft::new(contact, form.delivery_day, items, shipping_fee))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

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

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Ana Gomez".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: "1150000000".to_owned(),
            address: "Ibera 3852, CABA".to_owned(),
            address_verified: true,
            comment: "Dejar en porteria".to_owned(),
            delivery_day: NaiveDate::from_ymd_opt(2026, 8, 10),
        }
    }

    fn full_cart() -> CartLedger {
        let mut cart = CartLedger::new();
        cart.add(code("A"));
        cart.add(code("A"));
        cart.add(code("B"));
        cart
    }

    #[test]
    fn test_valid_checkout_passes() {
        let errors = validate(&valid_form(), &full_cart(), &catalog(), Decimal::ZERO);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_all_failures_are_aggregated() {
        let form = CheckoutForm::default();
        let errors = validate(&form, &CartLedger::new(), &catalog(), Decimal::ZERO);

        assert!(errors.contains(&CheckoutError::FullName));
        assert!(errors.contains(&CheckoutError::Email));
        assert!(errors.contains(&CheckoutError::Phone));
        assert!(errors.contains(&CheckoutError::Address));
        assert!(errors.contains(&CheckoutError::DeliveryDay));
        assert!(errors.contains(&CheckoutError::Comment));
        assert!(errors.contains(&CheckoutError::EmptyCart));
    }

    #[test]
    fn test_single_word_name_fails() {
        let mut form = valid_form();
        form.full_name = "Ana".to_owned();
        let errors = validate(&form, &full_cart(), &catalog(), Decimal::ZERO);
        assert_eq!(errors, vec![CheckoutError::FullName]);
    }

    #[test]
    fn test_short_phone_fails() {
        let mut form = valid_form();
        form.phone = "1234567".to_owned();
        let errors = validate(&form, &full_cart(), &catalog(), Decimal::ZERO);
        assert_eq!(errors, vec![CheckoutError::Phone]);
    }

    #[test]
    fn test_sentinel_address_passes_without_verification() {
        let mut form = valid_form();
        form.address = " a acordar ".to_owned();
        form.address_verified = false;
        let errors = validate(&form, &full_cart(), &catalog(), Decimal::ZERO);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unverified_address_fails() {
        let mut form = valid_form();
        form.address_verified = false;
        let errors = validate(&form, &full_cart(), &catalog(), Decimal::ZERO);
        assert_eq!(errors, vec![CheckoutError::Address]);
    }

    #[test]
    fn test_below_minimum_order() {
        let errors = validate(&valid_form(), &full_cart(), &catalog(), Decimal::from(5000));
        assert!(matches!(
            errors.as_slice(),
            [CheckoutError::BelowMinimum { minimum }] if *minimum == Decimal::from(5000)
        ));
    }

    #[test]
    fn test_unknown_product_in_cart() {
        let mut cart = full_cart();
        cart.add(code("ZZZ"));
        let errors = validate(&valid_form(), &cart, &catalog(), Decimal::ZERO);
        assert!(errors
            .iter()
            .any(|e| matches!(e, CheckoutError::UnknownProduct { .. })));
    }

    #[test]
    fn test_assemble_draft() {
        let draft = assemble_draft(
            &valid_form(),
            &full_cart(),
            &catalog(),
            Decimal::ZERO,
            Decimal::from(500),
        )
        .unwrap();

        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.subtotal, Decimal::from(1700));
        assert_eq!(draft.shipping_fee, Decimal::from(500));
        assert_eq!(draft.total, Decimal::from(2200));
        assert!(!draft.confirmed);
        assert!(!draft.delivered);

        let pan = draft.items.iter().find(|i| i.code.as_str() == "A").unwrap();
        assert_eq!(pan.quantity, 2);
        assert_eq!(pan.name, "Pan integral");
        assert_eq!(pan.subtotal, Decimal::from(500));
    }

    #[test]
    fn test_assemble_rejects_invalid() {
        let mut form = valid_form();
        form.email = "not-an-email".to_owned();
        let result = assemble_draft(&form, &full_cart(), &catalog(), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(result.unwrap_err(), vec![CheckoutError::Email]);
    }
}
