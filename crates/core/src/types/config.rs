//! Shop configuration types.
//!
//! The configuration document lives on the backend (`GET /config/list`,
//! `PUT /config/envio`); serde attributes here match that wire shape so the
//! same struct flows through the storefront, the admin panel, and the CLI.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A shipping price band.
///
/// Tiers are matched ascending by `max_km`: the first tier whose `max_km`
/// is at least the (rounded) driving distance applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingTier {
    /// Upper bound of the band, in km.
    #[serde(rename = "km")]
    pub max_km: Decimal,
    pub price: Decimal,
}

/// A weekday on which the shop delivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDay {
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub weekday: u8,
    /// Order cutoff time for same-day inclusion. Empty string on the wire
    /// means no cutoff.
    #[serde(with = "cutoff_format", default)]
    pub cutoff: Option<NaiveTime>,
}

/// The full shop configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(rename = "envio_tarifas", default)]
    pub shipping_tiers: Vec<ShippingTier>,
    #[serde(rename = "dias_entrega", default)]
    pub delivery_days: Vec<DeliveryDay>,
    #[serde(rename = "orden_categorias", default)]
    pub category_order: Vec<String>,
    #[serde(rename = "orden_subcategorias", default)]
    pub subcategory_order: Vec<String>,
    #[serde(rename = "pedido_minimo", default)]
    pub minimum_order: Decimal,
}

/// Validation failures for an edited configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("shipping tier {index}: distance bound must be positive")]
    NonPositiveTierDistance { index: usize },
    #[error("shipping tier {index}: price cannot be negative")]
    NegativeTierPrice { index: usize },
    #[error("shipping tiers repeat the {max_km} km bound")]
    DuplicateTierDistance { max_km: Decimal },
    #[error("delivery day {index}: weekday must be 0-6")]
    InvalidWeekday { index: usize },
    #[error("minimum order amount cannot be negative")]
    NegativeMinimumOrder,
}

impl ShopConfig {
    /// Validate an edited configuration before persisting it.
    ///
    /// Tiers may arrive in any order (the estimator sorts them), but their
    /// bounds must be positive and distinct and prices non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let mut seen = Vec::with_capacity(self.shipping_tiers.len());
        for (index, tier) in self.shipping_tiers.iter().enumerate() {
            if tier.max_km <= Decimal::ZERO {
                return Err(ConfigValidationError::NonPositiveTierDistance { index });
            }
            if tier.price < Decimal::ZERO {
                return Err(ConfigValidationError::NegativeTierPrice { index });
            }
            if seen.contains(&tier.max_km) {
                return Err(ConfigValidationError::DuplicateTierDistance {
                    max_km: tier.max_km,
                });
            }
            seen.push(tier.max_km);
        }

        for (index, day) in self.delivery_days.iter().enumerate() {
            if day.weekday > 6 {
                return Err(ConfigValidationError::InvalidWeekday { index });
            }
        }

        if self.minimum_order < Decimal::ZERO {
            return Err(ConfigValidationError::NegativeMinimumOrder);
        }

        Ok(())
    }

    /// Tiers sorted ascending by distance bound.
    #[must_use]
    pub fn sorted_tiers(&self) -> Vec<ShippingTier> {
        let mut tiers = self.shipping_tiers.clone();
        tiers.sort_by(|a, b| a.max_km.cmp(&b.max_km));
        tiers
    }
}

/// Serde adapter for the `"HH:MM"`-or-empty cutoff field.
mod cutoff_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
