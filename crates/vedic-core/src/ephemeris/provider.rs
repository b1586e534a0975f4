//! Seam to the external astrology API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ephemeris::types::EphemerisSnapshot;

/// Errors reported by an ephemeris provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Ephemeris provider unavailable: {0}")]
    Unavailable(String),
    #[error("Ephemeris provider returned HTTP {code}")]
    Status { code: u16 },
    #[error("Malformed ephemeris response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// Birth moment and place submitted by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthData {
    pub instant: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl BirthData {
    /// Parse a user-supplied birth instant. Accepts RFC 3339, or a naive
    /// `YYYY-MM-DD[ HH:MM[:SS]]` taken as UTC. Returns `None` for anything
    /// else so callers can fall back to the unsynchronized dasha.
    pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Source of raw sidereal positions.
///
/// `chart_at` is called once for the natal chart and once for the transit
/// chart; both use the birth place.
#[async_trait]
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn chart_at(
        &self,
        instant: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> Result<EphemerisSnapshot, ProviderError>;
}

/// Provider that always answers with the same pair of snapshots.
/// Used for replaying saved charts and in tests.
#[derive(Debug, Clone)]
pub struct StaticEphemeris {
    natal: EphemerisSnapshot,
    transit: EphemerisSnapshot,
    birth: DateTime<Utc>,
}

impl StaticEphemeris {
    pub fn new(natal: EphemerisSnapshot, transit: EphemerisSnapshot, birth: DateTime<Utc>) -> Self {
        Self { natal, transit, birth }
    }
}

#[async_trait]
impl EphemerisProvider for StaticEphemeris {
    fn name(&self) -> &str {
        "static"
    }

    async fn chart_at(
        &self,
        instant: DateTime<Utc>,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<EphemerisSnapshot, ProviderError> {
        if instant == self.birth {
            Ok(self.natal.clone())
        } else {
            Ok(self.transit.clone())
        }
    }
}
