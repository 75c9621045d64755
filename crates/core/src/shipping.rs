//! Shipping cost computation.
//!
//! The pure half of the shipping estimator: destination normalization, the
//! arrangement sentinel, distance rounding, and tier lookup. The async
//! half (distance lookup, quote caching, request sequencing) lives in the
//! storefront service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ShippingTier;

/// Destination sentinel meaning "shipping will be arranged by hand".
///
/// Matched case-insensitively after trimming; it bypasses the distance
/// lookup entirely and quotes a zero fee.
pub const ARRANGED_SENTINEL: &str = "A ACORDAR";

/// Severity of a quote message, mapped to styling by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Outcome of a shipping estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub cost: Decimal,
    pub message: String,
    pub severity: Severity,
    /// Rounded driving distance, absent for sentinel and transport
    /// failures.
    pub distance_km: Option<Decimal>,
}

impl ShippingQuote {
    /// Zero-cost quote for the arrangement sentinel.
    #[must_use]
    pub fn arranged() -> Self {
        Self {
            cost: Decimal::ZERO,
            message: "Direccion a acordar. El costo de envio se definira al confirmar el pedido."
                .to_owned(),
            severity: Severity::Info,
            distance_km: None,
        }
    }

    /// Zero-cost error quote for a failed or ambiguous distance lookup.
    #[must_use]
    pub fn lookup_failed(message: impl Into<String>) -> Self {
        Self {
            cost: Decimal::ZERO,
            message: message.into(),
            severity: Severity::Error,
            distance_km: None,
        }
    }

    /// Whether checkout may proceed with this quote.
    ///
    /// Error quotes block the submit action; the sentinel and tier matches
    /// do not.
    #[must_use]
    pub const fn allows_checkout(&self) -> bool {
        !matches!(self.severity, Severity::Error)
    }
}

/// Normalize a destination for use as a cache key: trim and lowercase.
#[must_use]
pub fn normalize_destination(destination: &str) -> String {
    destination.trim().to_lowercase()
}

/// Whether the destination is the manual-arrangement sentinel.
#[must_use]
pub fn is_arranged_destination(destination: &str) -> bool {
    destination.trim().eq_ignore_ascii_case(ARRANGED_SENTINEL)
}

/// Round a distance in meters up to the nearest 0.1 km.
///
/// Integer arithmetic: 4950 m becomes 5.0 km, 10_001 m becomes 10.1 km.
#[must_use]
pub fn round_up_to_tenth_km(meters: u32) -> Decimal {
    let tenths = meters.div_ceil(100);
    Decimal::new(i64::from(tenths), 1)
}

/// Find the applicable tier for a rounded distance.
///
/// Tiers are scanned ascending by `max_km`; the first tier whose bound is
/// at least the distance wins. `None` means the address is out of the
/// service area.
#[must_use]
pub fn match_tier(tiers: &[ShippingTier], distance_km: Decimal) -> Option<&ShippingTier> {
    let mut sorted: Vec<&ShippingTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| a.max_km.cmp(&b.max_km));
    sorted.into_iter().find(|tier| distance_km <= tier.max_km)
}

/// Build the quote for a resolved distance.
#[must_use]
pub fn quote_for_distance(tiers: &[ShippingTier], distance_km: Decimal) -> ShippingQuote {
    match match_tier(tiers, distance_km) {
        Some(tier) if tier.price == Decimal::ZERO => ShippingQuote {
            cost: Decimal::ZERO,
            message: format!("Felicidades! Tenes envio gratis ({distance_km} km)"),
            severity: Severity::Success,
            distance_km: Some(distance_km),
        },
        Some(tier) => ShippingQuote {
            cost: tier.price,
            message: format!("Envio {distance_km} km - ${}", tier.price),
            severity: Severity::Success,
            distance_km: Some(distance_km),
        },
        None => ShippingQuote {
            cost: Decimal::ZERO,
            message: format!(
                "Fuera del area de entrega ({distance_km} km). Escribinos y acordamos un precio."
            ),
            severity: Severity::Error,
            distance_km: Some(distance_km),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tiers() -> Vec<ShippingTier> {
        vec![
            ShippingTier {
                max_km: Decimal::from(5),
                price: Decimal::ZERO,
            },
            ShippingTier {
                max_km: Decimal::from(10),
                price: Decimal::from(500),
            },
        ]
    }

    #[test]
    fn test_sentinel_any_case_and_whitespace() {
        assert!(is_arranged_destination("A ACORDAR"));
        assert!(is_arranged_destination("  a acordar  "));
        assert!(is_arranged_destination("A Acordar"));
        assert!(!is_arranged_destination("a acordar ya"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_destination("  Ibera 3852, CABA  "),
            "ibera 3852, caba"
        );
    }

    #[test]
    fn test_round_up() {
        // 4.95 km rounds up to 5.0
        assert_eq!(round_up_to_tenth_km(4950), Decimal::new(50, 1));
        // exact boundary stays put
        assert_eq!(round_up_to_tenth_km(5000), Decimal::new(50, 1));
        // 10.01 km rounds up to 10.1
        assert_eq!(round_up_to_tenth_km(10_010), Decimal::new(101, 1));
        assert_eq!(round_up_to_tenth_km(0), Decimal::ZERO);
    }

    #[test]
    fn test_rounded_distance_matches_first_tier() {
        let distance = round_up_to_tenth_km(4950);
        assert_eq!(distance, Decimal::new(50, 1));
        let tiers = tiers();
        let tier = match_tier(&tiers, distance).unwrap();
        assert_eq!(tier.price, Decimal::ZERO);
    }

    #[test]
    fn test_out_of_area() {
        let distance = round_up_to_tenth_km(10_010);
        assert!(match_tier(&tiers(), distance).is_none());

        let quote = quote_for_distance(&tiers(), distance);
        assert_eq!(quote.severity, Severity::Error);
        assert_eq!(quote.cost, Decimal::ZERO);
        assert!(quote.message.contains("10.1 km"));
        assert!(!quote.allows_checkout());
    }

    #[test]
    fn test_unsorted_tiers_are_scanned_ascending() {
        let unsorted = vec![
            ShippingTier {
                max_km: Decimal::from(10),
                price: Decimal::from(500),
            },
            ShippingTier {
                max_km: Decimal::from(5),
                price: Decimal::ZERO,
            },
        ];
        let tier = match_tier(&unsorted, Decimal::from(3)).unwrap();
        assert_eq!(tier.max_km, Decimal::from(5));
    }

    #[test]
    fn test_free_shipping_message() {
        let quote = quote_for_distance(&tiers(), Decimal::new(32, 1));
        assert_eq!(quote.cost, Decimal::ZERO);
        assert_eq!(quote.severity, Severity::Success);
        assert!(quote.message.contains("gratis"));
        assert!(quote.allows_checkout());
    }

    #[test]
    fn test_paid_shipping_message() {
        let quote = quote_for_distance(&tiers(), Decimal::new(72, 1));
        assert_eq!(quote.cost, Decimal::from(500));
        assert!(quote.message.contains("7.2 km"));
        assert!(quote.message.contains("$500"));
    }

    #[test]
    fn test_arranged_quote() {
        let quote = ShippingQuote::arranged();
        assert_eq!(quote.cost, Decimal::ZERO);
        assert_eq!(quote.severity, Severity::Info);
        assert!(quote.allows_checkout());
    }

    #[test]
    fn test_no_tiers_means_out_of_area() {
        let quote = quote_for_distance(&[], Decimal::ONE);
        assert_eq!(quote.severity, Severity::Error);
    }
}
