//! Driving-distance lookup.
//!
//! The shipping estimator needs one number: driving meters from the shop
//! to the destination. [`DistanceLookup`] is the seam; the HTTP
//! implementation talks to a distance-matrix REST service, and tests
//! substitute stubs.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::DistanceConfig;

/// Errors from the distance boundary.
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    /// Network or transport-level failure.
    #[error("distance request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but not with a usable matrix.
    #[error("distance service error: {0}")]
    Service(String),

    /// The destination could not be resolved or routed.
    #[error("no route to destination: {0}")]
    NoRoute(String),
}

/// Driving-distance collaborator.
#[async_trait]
pub trait DistanceLookup: Send + Sync {
    /// Driving distance in meters between two free-text addresses.
    async fn driving_distance_meters(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<u32, DistanceError>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// Distance-matrix REST client (single origin, single destination,
/// driving mode).
pub struct HttpDistanceClient {
    client: reqwest::Client,
    config: DistanceConfig,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<MatrixDistance>,
}

#[derive(Debug, Deserialize)]
struct MatrixDistance {
    /// Meters.
    value: u32,
}

impl HttpDistanceClient {
    #[must_use]
    pub fn new(config: DistanceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl DistanceLookup for HttpDistanceClient {
    #[instrument(skip(self, origin), fields(destination = %destination))]
    async fn driving_distance_meters(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<u32, DistanceError> {
        let response = self
            .client
            .get(self.config.base_url.as_str())
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("mode", "driving"),
                ("key", self.config.api_key.expose_secret()),
            ])
            .send()
            .await?;

        let matrix: MatrixResponse = response.error_for_status()?.json().await?;

        if matrix.status != "OK" {
            return Err(DistanceError::Service(matrix.status));
        }

        let element = matrix
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .ok_or_else(|| DistanceError::Service("empty distance matrix".to_owned()))?;

        if element.status != "OK" {
            return Err(DistanceError::NoRoute(destination.to_owned()));
        }

        let meters = element
            .distance
            .as_ref()
            .map(|d| d.value)
            .ok_or_else(|| DistanceError::Service("element without distance".to_owned()))?;

        debug!(meters, "distance resolved");
        Ok(meters)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_response_parsing() {
        let body = r#"{
            "status": "OK",
            "rows": [{"elements": [{"status": "OK", "distance": {"value": 4950, "text": "5 km"}}]}]
        }"#;
        let matrix: MatrixResponse = serde_json::from_str(body).unwrap();
        assert_eq!(matrix.status, "OK");
        assert_eq!(
            matrix.rows[0].elements[0].distance.as_ref().unwrap().value,
            4950
        );
    }

    #[test]
    fn test_matrix_response_not_found_element() {
        let body = r#"{
            "status": "OK",
            "rows": [{"elements": [{"status": "NOT_FOUND"}]}]
        }"#;
        let matrix: MatrixResponse = serde_json::from_str(body).unwrap();
        assert_eq!(matrix.rows[0].elements[0].status, "NOT_FOUND");
        assert!(matrix.rows[0].elements[0].distance.is_none());
    }
}
