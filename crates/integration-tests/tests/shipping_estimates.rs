//! Shipping estimator behaviour against stub distance lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use almacen_core::shipping::Severity;
use almacen_core::types::ShippingTier;
use almacen_storefront::distance::{DistanceError, DistanceLookup};
use almacen_storefront::shipping::{QuoteSlot, ShippingEstimator};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Lookup that resolves every destination to a fixed distance and counts
/// invocations.
struct FixedLookup {
    meters: u32,
    calls: AtomicUsize,
}

impl FixedLookup {
    fn new(meters: u32) -> Arc<Self> {
        Arc::new(Self {
            meters,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DistanceLookup for FixedLookup {
    async fn driving_distance_meters(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<u32, DistanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.meters)
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

#[tokio::test]
async fn boundary_distance_rounds_into_the_free_tier() {
    let lookup = FixedLookup::new(4950);
    let estimator = ShippingEstimator::new("Origen 1", Arc::clone(&lookup) as Arc<dyn DistanceLookup>);

    let quote = estimator.estimate("Destino 1", &tiers()).await;
    assert_eq!(quote.severity, Severity::Success);
    assert_eq!(quote.cost, Decimal::ZERO);
    assert_eq!(quote.distance_km, Some(Decimal::new(50, 1)));
}

#[tokio::test]
async fn repeated_estimates_hit_the_cache_not_the_service() {
    let lookup = FixedLookup::new(7200);
    let estimator = ShippingEstimator::new("Origen 1", Arc::clone(&lookup) as Arc<dyn DistanceLookup>);

    let first = estimator.estimate("Ibera 3852, CABA", &tiers()).await;
    let second = estimator.estimate("  ibera 3852, caba  ", &tiers()).await;

    assert_eq!(first, second);
    assert_eq!(first.cost, Decimal::from(500));
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn out_of_area_blocks_but_sentinel_still_passes() {
    let lookup = FixedLookup::new(10_010);
    let estimator = ShippingEstimator::new("Origen 1", Arc::clone(&lookup) as Arc<dyn DistanceLookup>);

    let far = estimator.estimate("Muy Lejos 999", &tiers()).await;
    assert_eq!(far.severity, Severity::Error);
    assert!(!far.allows_checkout());
    assert!(far.message.contains("10.1 km"));

    let arranged = estimator.estimate("A ACORDAR", &tiers()).await;
    assert_eq!(arranged.severity, Severity::Info);
    assert!(arranged.allows_checkout());
    assert_eq!(arranged.cost, Decimal::ZERO);

    // Neither estimate consulted the cache for the sentinel.
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overlapping_estimates_apply_last_write_wins() {
    // Two requests race: the visitor types an address (slow quote, $900),
    // then corrects it (fast quote, $500). The correction settles first.
    let slow_lookup = FixedLookup::new(9_500); // paid tier
    let fast_lookup = FixedLookup::new(3_000); // free tier

    let estimator_slow =
        ShippingEstimator::new("Origen 1", Arc::clone(&slow_lookup) as Arc<dyn DistanceLookup>);
    let estimator_fast =
        ShippingEstimator::new("Origen 1", Arc::clone(&fast_lookup) as Arc<dyn DistanceLookup>);

    let mut slot = QuoteSlot::default();
    let first_ticket = slot.issue();
    let second_ticket = slot.issue();

    // Second (newer) request settles first and is applied.
    let newer = estimator_fast.estimate("Direccion corregida", &tiers()).await;
    assert!(slot.apply(second_ticket, newer.cost));

    // First (older) settles afterwards and must be discarded.
    let older = estimator_slow.estimate("Direccion vieja", &tiers()).await;
    assert!(!slot.apply(first_ticket, older.cost));

    // The applied fee is the newer quote's: free tier at 3 km.
    assert_eq!(slot.fee(), Decimal::ZERO);
    assert_eq!(older.cost, Decimal::from(500));
}
