use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::{AstroError, Result};
use crate::vedic::houses::HouseSigns;

/// The nine grahas of the Vimshottari system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Body {
    #[serde(rename = "Su")]
    Sun,
    #[serde(rename = "Mo")]
    Moon,
    #[serde(rename = "Ma")]
    Mars,
    #[serde(rename = "Me")]
    Mercury,
    #[serde(rename = "Ju")]
    Jupiter,
    #[serde(rename = "Ve")]
    Venus,
    #[serde(rename = "Sa")]
    Saturn,
    #[serde(rename = "Ra")]
    Rahu,
    #[serde(rename = "Ke")]
    Ketu,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Moon,
        Body::Mars,
        Body::Mercury,
        Body::Jupiter,
        Body::Venus,
        Body::Saturn,
        Body::Rahu,
        Body::Ketu,
    ];

    /// Two-letter code used on the wire and in dasha labels.
    pub fn code(self) -> &'static str {
        match self {
            Body::Sun => "Su",
            Body::Moon => "Mo",
            Body::Mars => "Ma",
            Body::Mercury => "Me",
            Body::Jupiter => "Ju",
            Body::Venus => "Ve",
            Body::Saturn => "Sa",
            Body::Rahu => "Ra",
            Body::Ketu => "Ke",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Mercury => "Mercury",
            Body::Jupiter => "Jupiter",
            Body::Venus => "Venus",
            Body::Saturn => "Saturn",
            Body::Rahu => "Rahu",
            Body::Ketu => "Ketu",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = AstroError;

    /// Accepts two-letter codes or full names, case-insensitive.
    /// `north_node`/`south_node` map to Rahu/Ketu.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|b| b.code().to_lowercase() == lower || b.name().to_lowercase() == lower)
            .or(match lower.as_str() {
                "north_node" => Some(Body::Rahu),
                "south_node" => Some(Body::Ketu),
                _ => None,
            })
            .ok_or_else(|| AstroError::invalid("body", s))
    }
}

pub const SIGN_NAMES: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Reject any sign outside 1..=12.
pub fn validate_sign(field: &'static str, sign: u8) -> Result<u8> {
    if (1..=12).contains(&sign) {
        Ok(sign)
    } else {
        Err(AstroError::invalid(field, sign))
    }
}

/// Reject longitudes that are not finite or fall outside [0, 360).
pub fn validate_longitude(field: &'static str, longitude: f64) -> Result<f64> {
    if longitude.is_finite() && (0.0..360.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(AstroError::invalid(field, longitude))
    }
}

pub fn sign_name(sign: u8) -> Result<&'static str> {
    let sign = validate_sign("sign", sign)?;
    Ok(SIGN_NAMES[(sign - 1) as usize])
}

/// Sign (1..=12) containing a longitude.
pub fn sign_from_longitude(longitude: f64) -> Result<u8> {
    let lon = validate_longitude("longitude", longitude)?;
    Ok((lon / 30.0) as u8 % 12 + 1)
}

/// Nakshatra annotation as delivered by the provider (or filled in locally).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NakshatraInfo {
    pub name: String,
    pub pada: u8,
    pub lord: String,
}

/// Position of one body as reported by the ephemeris provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    /// Zodiac sign, 1 (Aries) to 12 (Pisces)
    pub sign: u8,
    /// Sidereal ecliptic longitude in degrees (0-360)
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nakshatra: Option<NakshatraInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseCusp {
    pub sign: u8,
}

/// Raw chart snapshot for one instant: planet codes to positions plus the
/// house table keyed "1".."12".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EphemerisSnapshot {
    #[serde(default)]
    pub planets: HashMap<String, PlanetPosition>,
    #[serde(default)]
    pub houses: HashMap<String, HouseCusp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendant: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tithi: Option<u8>,
}

const ASCENDANT_KEYS: &[&str] = &["As", "Asc", "asc", "ascendant", "Lagna"];

impl EphemerisSnapshot {
    /// Typed, validated planet positions. Keys that are not one of the nine
    /// grahas (outer planets, angles) are skipped. Two keys naming the same
    /// graha ("Mo" and "Moon") are rejected.
    pub fn positions(&self) -> Result<BTreeMap<Body, PlanetPosition>> {
        let mut out = BTreeMap::new();
        for (key, pos) in &self.planets {
            let Ok(body) = key.parse::<Body>() else {
                log::debug!("Skipping non-graha ephemeris key {key}");
                continue;
            };
            validate_sign("sign", pos.sign)?;
            validate_longitude("longitude", pos.longitude)?;
            if out.insert(body, pos.clone()).is_some() {
                return Err(AstroError::invalid("duplicate planet", body.name()));
            }
        }
        Ok(out)
    }

    /// Ascendant sign: explicit field, then house 1, then an ascendant
    /// entry in the planet table.
    pub fn ascendant_sign(&self) -> Result<u8> {
        let sign = self
            .ascendant
            .or_else(|| self.houses.get("1").map(|h| h.sign))
            .or_else(|| {
                ASCENDANT_KEYS
                    .iter()
                    .find_map(|k| self.planets.get(*k).map(|p| p.sign))
            })
            .ok_or(AstroError::MissingData("ascendant"))?;
        validate_sign("ascendant", sign)
    }

    /// House-to-sign table: the provider's when all twelve houses are
    /// present, otherwise whole-sign houses from the ascendant.
    pub fn house_signs(&self, ascendant: u8) -> Result<HouseSigns> {
        let mut signs = [0u8; 12];
        for house in 1..=12u8 {
            match self.houses.get(&house.to_string()) {
                Some(cusp) => signs[(house - 1) as usize] = cusp.sign,
                None => return HouseSigns::whole_sign(ascendant),
            }
        }
        HouseSigns::try_from(signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(sign: u8, longitude: f64) -> PlanetPosition {
        PlanetPosition {
            sign,
            longitude,
            nakshatra: None,
        }
    }

    #[test]
    fn test_body_parsing() {
        assert_eq!("Sa".parse::<Body>().unwrap(), Body::Saturn);
        assert_eq!("jupiter".parse::<Body>().unwrap(), Body::Jupiter);
        assert_eq!("north_node".parse::<Body>().unwrap(), Body::Rahu);
        assert!("Ur".parse::<Body>().is_err());
    }

    #[test]
    fn test_sign_helpers() {
        assert_eq!(sign_name(1).unwrap(), "Aries");
        assert_eq!(sign_name(12).unwrap(), "Pisces");
        assert!(sign_name(0).is_err());
        assert!(sign_name(13).is_err());
        assert_eq!(sign_from_longitude(45.0).unwrap(), 2);
        assert_eq!(sign_from_longitude(359.9).unwrap(), 12);
        assert!(sign_from_longitude(360.0).is_err());
        assert!(sign_from_longitude(f64::NAN).is_err());
    }

    #[test]
    fn test_positions_skip_unknown_and_validate() {
        let mut snap = EphemerisSnapshot::default();
        snap.planets.insert("Su".to_string(), pos(5, 130.0));
        snap.planets.insert("Ur".to_string(), pos(3, 70.0));
        let positions = snap.positions().unwrap();
        assert_eq!(positions.len(), 1);
        assert!(positions.contains_key(&Body::Sun));

        snap.planets.insert("Ma".to_string(), pos(14, 10.0));
        assert!(matches!(
            snap.positions(),
            Err(AstroError::InvalidAstronomicalInput { field: "sign", .. })
        ));
    }

    #[test]
    fn test_positions_reject_two_keys_for_one_body() {
        let mut snap = EphemerisSnapshot::default();
        snap.planets.insert("Mo".to_string(), pos(2, 45.0));
        snap.planets.insert("Moon".to_string(), pos(3, 75.0));
        for _ in 0..10 {
            assert!(matches!(
                snap.clone().positions(),
                Err(AstroError::InvalidAstronomicalInput { field: "duplicate planet", .. })
            ));
        }
    }

    #[test]
    fn test_ascendant_resolution() {
        let mut snap = EphemerisSnapshot::default();
        assert_eq!(snap.ascendant_sign(), Err(AstroError::MissingData("ascendant")));

        snap.planets.insert("As".to_string(), pos(4, 100.0));
        assert_eq!(snap.ascendant_sign().unwrap(), 4);

        snap.houses.insert("1".to_string(), HouseCusp { sign: 7 });
        assert_eq!(snap.ascendant_sign().unwrap(), 7);

        snap.ascendant = Some(0);
        assert!(snap.ascendant_sign().is_err());
    }

    #[test]
    fn test_house_signs_partial_table_falls_back_to_whole_sign() {
        let mut snap = EphemerisSnapshot::default();
        snap.houses.insert("1".to_string(), HouseCusp { sign: 10 });
        let signs = snap.house_signs(10).unwrap();
        assert_eq!(signs.sign_of(1), Some(10));
        assert_eq!(signs.sign_of(4), Some(1));
    }

    #[test]
    fn test_full_house_table_is_taken_verbatim() {
        let mut snap = EphemerisSnapshot::default();
        for house in 1..=12u8 {
            // an unequal table, not derivable from the ascendant
            let sign = if house == 12 { 11 } else { house };
            snap.houses.insert(house.to_string(), HouseCusp { sign });
        }
        let signs = snap.house_signs(1).unwrap();
        assert_eq!(signs.sign_of(12), Some(11));

        snap.houses.insert("6".to_string(), HouseCusp { sign: 13 });
        assert!(snap.house_signs(1).is_err());
    }
}
