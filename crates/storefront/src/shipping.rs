//! The shipping estimator.
//!
//! Wraps the pure tier math from `almacen_core::shipping` with the
//! asynchronous parts: the distance lookup, a per-destination quote cache,
//! and last-write-wins sequencing for overlapping estimates.

use std::sync::Arc;

use almacen_core::shipping::{
    ShippingQuote, is_arranged_destination, normalize_destination, quote_for_distance,
    round_up_to_tenth_km,
};
use almacen_core::types::ShippingTier;
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::distance::{DistanceError, DistanceLookup};

/// Destinations a session will realistically quote.
const QUOTE_CACHE_CAPACITY: u64 = 10_000;

/// Shipping estimator with per-destination memoization.
///
/// Successful quotes are cached under the normalized destination for the
/// process lifetime; failures and out-of-area results are never cached so
/// a retry can succeed. Cached quotes go stale if tiers change, which the
/// shop accepts.
#[derive(Clone)]
pub struct ShippingEstimator {
    origin: String,
    lookup: Arc<dyn DistanceLookup>,
    cache: Cache<String, ShippingQuote>,
}

impl ShippingEstimator {
    #[must_use]
    pub fn new(origin: impl Into<String>, lookup: Arc<dyn DistanceLookup>) -> Self {
        Self {
            origin: origin.into(),
            lookup,
            cache: Cache::builder().max_capacity(QUOTE_CACHE_CAPACITY).build(),
        }
    }

    /// Estimate the shipping cost to a free-text destination.
    ///
    /// Failures degrade to zero-cost error quotes instead of surfacing;
    /// checkout stays possible only through the arrangement sentinel.
    #[instrument(skip(self, tiers), fields(destination = %destination))]
    pub async fn estimate(&self, destination: &str, tiers: &[ShippingTier]) -> ShippingQuote {
        // The sentinel bypasses lookup and cache entirely.
        if is_arranged_destination(destination) {
            return ShippingQuote::arranged();
        }

        let key = normalize_destination(destination);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("quote cache hit");
            return cached;
        }

        let meters = match self
            .lookup
            .driving_distance_meters(&self.origin, destination)
            .await
        {
            Ok(meters) => meters,
            Err(DistanceError::NoRoute(_)) => {
                return ShippingQuote::lookup_failed("No se puede entregar en esa direccion.");
            }
            Err(error) => {
                warn!(%error, "distance lookup failed");
                return ShippingQuote::lookup_failed("Error al calcular la distancia.");
            }
        };

        let distance_km = round_up_to_tenth_km(meters);
        let quote = quote_for_distance(tiers, distance_km);

        // Only settled tier matches are worth remembering.
        if quote.allows_checkout() {
            self.cache.insert(key, quote.clone()).await;
        }

        quote
    }
}

// =============================================================================
// Request sequencing
// =============================================================================

/// Last-write-wins guard for overlapping quote requests.
///
/// Estimates are triggered on every address change and are not cancelled
/// when superseded; without a guard a slow early request can settle after
/// a fast later one and overwrite it. Each request takes a ticket before
/// awaiting and may only apply its result if no newer ticket has been
/// applied since.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSlot {
    issued: u64,
    applied: u64,
    fee: Decimal,
}

impl QuoteSlot {
    /// Take the next ticket.
    pub const fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Try to apply a settled quote fee; stale tickets are discarded.
    pub fn apply(&mut self, ticket: u64, fee: Decimal) -> bool {
        if ticket > self.applied {
            self.applied = ticket;
            self.fee = fee;
            true
        } else {
            false
        }
    }

    /// The currently applied shipping fee.
    #[must_use]
    pub const fn fee(&self) -> Decimal {
        self.fee
    }

    /// Forget everything (after checkout or address clearing).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use almacen_core::shipping::Severity;
    use async_trait::async_trait;

    use super::*;

    /// Stub lookup with a fixed outcome and a call counter.
    struct StubLookup {
        meters: Result<u32, fn(String) -> DistanceError>,
        calls: AtomicUsize,
    }

    impl StubLookup {
        fn ok(meters: u32) -> Self {
            Self {
                meters: Ok(meters),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(make: fn(String) -> DistanceError) -> Self {
            Self {
                meters: Err(make),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DistanceLookup for StubLookup {
        async fn driving_distance_meters(
            &self,
            _origin: &str,
            destination: &str,
        ) -> Result<u32, DistanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.meters {
                Ok(meters) => Ok(*meters),
                Err(make) => Err(make(destination.to_owned())),
            }
        }
    }

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

    fn estimator(lookup: Arc<StubLookup>) -> ShippingEstimator {
        ShippingEstimator::new("Origen 123", lookup)
    }

    #[tokio::test]
    async fn test_sentinel_bypasses_lookup() {
        let lookup = Arc::new(StubLookup::ok(4950));
        let est = estimator(Arc::clone(&lookup));

        let quote = est.estimate("  a ACordar ", &tiers()).await;
        assert_eq!(quote.cost, Decimal::ZERO);
        assert_eq!(quote.severity, Severity::Info);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_quote_is_cached() {
        let lookup = Arc::new(StubLookup::ok(4950));
        let est = estimator(Arc::clone(&lookup));

        let first = est.estimate("Ibera 3852, CABA", &tiers()).await;
        assert_eq!(first.cost, Decimal::ZERO);
        assert_eq!(first.severity, Severity::Success);

        // Same destination modulo case/whitespace: served from cache.
        let second = est.estimate("  IBERA 3852, caba ", &tiers()).await;
        assert_eq!(second, first);
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_not_cached() {
        let lookup = Arc::new(StubLookup::failing(|_| {
            DistanceError::Service("DOWN".to_owned())
        }));
        let est = estimator(Arc::clone(&lookup));

        let quote = est.estimate("Calle Falsa 123", &tiers()).await;
        assert_eq!(quote.severity, Severity::Error);
        assert_eq!(quote.cost, Decimal::ZERO);

        est.estimate("Calle Falsa 123", &tiers()).await;
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_route_message() {
        let lookup = Arc::new(StubLookup::failing(DistanceError::NoRoute));
        let est = estimator(lookup);

        let quote = est.estimate("Atlantida", &tiers()).await;
        assert_eq!(quote.severity, Severity::Error);
        assert!(quote.message.contains("No se puede entregar"));
    }

    #[tokio::test]
    async fn test_out_of_area_not_cached() {
        let lookup = Arc::new(StubLookup::ok(10_010));
        let est = estimator(Arc::clone(&lookup));

        let quote = est.estimate("Muy Lejos 1", &tiers()).await;
        assert_eq!(quote.severity, Severity::Error);
        assert!(quote.message.contains("10.1 km"));

        est.estimate("Muy Lejos 1", &tiers()).await;
        assert_eq!(lookup.calls(), 2);
    }

    #[test]
    fn test_quote_slot_last_write_wins() {
        let mut slot = QuoteSlot::default();
        let early = slot.issue();
        let late = slot.issue();

        // The late request settles first.
        assert!(slot.apply(late, Decimal::from(500)));
        assert_eq!(slot.fee(), Decimal::from(500));

        // The early result arrives afterwards and is discarded.
        assert!(!slot.apply(early, Decimal::from(900)));
        assert_eq!(slot.fee(), Decimal::from(500));
    }

    #[test]
    fn test_quote_slot_in_order_applies() {
        let mut slot = QuoteSlot::default();
        let first = slot.issue();
        assert!(slot.apply(first, Decimal::from(100)));
        let second = slot.issue();
        assert!(slot.apply(second, Decimal::from(200)));
        assert_eq!(slot.fee(), Decimal::from(200));
    }

    #[test]
    fn test_quote_slot_reset() {
        let mut slot = QuoteSlot::default();
        let t = slot.issue();
        slot.apply(t, Decimal::from(100));
        slot.reset();
        assert_eq!(slot.fee(), Decimal::ZERO);
        assert_eq!(slot.issue(), 1);
    }
}
