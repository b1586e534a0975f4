//! Lunar phase labels.
//!
//! The chart phase comes from the tithi (lunar day 1..=30). A mean synodic
//! approximation is kept for charts without natal luminaries.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ephemeris::types::validate_longitude;
use crate::error::{AstroError, Result};

pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_2;
/// Degrees of Moon-Sun elongation per tithi
pub const TITHI_SPAN: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    New,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    Full,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl MoonPhase {
    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    /// Phase for a tithi. Amavasya (30) is New, Purnima (15) is Full.
    pub fn from_tithi(tithi: u8) -> Result<Self> {
        let phase = match tithi {
            30 => MoonPhase::New,
            15 => MoonPhase::Full,
            1..=7 => MoonPhase::WaxingCrescent,
            8..=14 => MoonPhase::WaxingGibbous,
            16..=22 => MoonPhase::WaningGibbous,
            23..=29 => MoonPhase::WaningCrescent,
            _ => return Err(AstroError::invalid("tithi", tithi)),
        };
        Ok(phase)
    }

    /// Phase for a fraction of the synodic month (0 = new, 0.5 = full).
    pub fn from_fraction(fraction: f64) -> Self {
        match fraction {
            f if f < 0.03 => MoonPhase::New,
            f if f < 0.22 => MoonPhase::WaxingCrescent,
            f if f < 0.28 => MoonPhase::FirstQuarter,
            f if f < 0.47 => MoonPhase::WaxingGibbous,
            f if f < 0.53 => MoonPhase::Full,
            f if f < 0.72 => MoonPhase::WaningGibbous,
            f if f < 0.78 => MoonPhase::LastQuarter,
            f if f < 0.97 => MoonPhase::WaningCrescent,
            _ => MoonPhase::New,
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tithi (1..=30) from sidereal or tropical Sun and Moon longitudes.
pub fn tithi_from_longitudes(sun_longitude: f64, moon_longitude: f64) -> Result<u8> {
    let sun = validate_longitude("sun longitude", sun_longitude)?;
    let moon = validate_longitude("moon longitude", moon_longitude)?;
    let elongation = (moon - sun).rem_euclid(360.0);
    Ok(((elongation / TITHI_SPAN) as u8).min(29) + 1)
}

/// Reference new moon, 2000-01-06 18:14 UTC.
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or_default()
}

/// Fraction of the mean synodic month elapsed at `at`, in [0, 1).
pub fn synodic_fraction(at: DateTime<Utc>) -> f64 {
    let days = (at - reference_new_moon()).num_milliseconds() as f64 / 86_400_000.0;
    (days / SYNODIC_MONTH_DAYS).rem_euclid(1.0)
}

pub fn synodic_phase(at: DateTime<Utc>) -> MoonPhase {
    MoonPhase::from_fraction(synodic_fraction(at))
}
