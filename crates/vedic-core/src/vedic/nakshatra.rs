//! Nakshatra utilities for Vedic astrology.
//!
//! Nakshatras are 27 lunar mansions, each spanning 13°20' (360/27 degrees).
//! Each nakshatra is divided into 4 padas (quarters).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::ephemeris::types::{validate_longitude, Body, NakshatraInfo, PlanetPosition};
use crate::error::Result;

pub const NAKSHATRA_SEGMENT_SIZE: f64 = 360.0 / 27.0;
pub const PADA_SIZE: f64 = NAKSHATRA_SEGMENT_SIZE / 4.0;

// (display_name, planetary lord)
pub const NAKSHATRA_ORDER: [(&str, Body); 27] = [
    ("Ashwini", Body::Ketu),
    ("Bharani", Body::Venus),
    ("Krittika", Body::Sun),
    ("Rohini", Body::Moon),
    ("Mrigashira", Body::Mars),
    ("Ardra", Body::Rahu),
    ("Punarvasu", Body::Jupiter),
    ("Pushya", Body::Saturn),
    ("Ashlesha", Body::Mercury),
    ("Magha", Body::Ketu),
    ("Purva Phalguni", Body::Venus),
    ("Uttara Phalguni", Body::Sun),
    ("Hasta", Body::Moon),
    ("Chitra", Body::Mars),
    ("Swati", Body::Rahu),
    ("Vishakha", Body::Jupiter),
    ("Anuradha", Body::Saturn),
    ("Jyeshtha", Body::Mercury),
    ("Mula", Body::Ketu),
    ("Purva Ashadha", Body::Venus),
    ("Uttara Ashadha", Body::Sun),
    ("Shravana", Body::Moon),
    ("Dhanishta", Body::Mars),
    ("Shatabhisha", Body::Rahu),
    ("Purva Bhadrapada", Body::Jupiter),
    ("Uttara Bhadrapada", Body::Saturn),
    ("Revati", Body::Mercury),
];

#[derive(Debug, Clone, Serialize)]
pub struct NakshatraMetadata {
    pub index: usize,
    pub name: &'static str,
    pub lord: Body,
    pub start: f64,
    /// Degrees already traversed inside the nakshatra
    pub offset: f64,
    /// Fraction of the nakshatra traversed, 0..1
    pub progress: f64,
    pub pada: u8,
}

/// Return metadata for the nakshatra containing the given longitude.
pub fn nakshatra_for_longitude(longitude: f64) -> Result<NakshatraMetadata> {
    let lon = validate_longitude("longitude", longitude)?;
    let index = ((lon / NAKSHATRA_SEGMENT_SIZE) as usize).min(NAKSHATRA_ORDER.len() - 1);
    let (name, lord) = NAKSHATRA_ORDER[index];
    let start = index as f64 * NAKSHATRA_SEGMENT_SIZE;
    let offset = lon - start;
    let pada = ((offset / PADA_SIZE) as u8 + 1).min(4);

    Ok(NakshatraMetadata {
        index,
        name,
        lord,
        start,
        offset,
        progress: offset / NAKSHATRA_SEGMENT_SIZE,
        pada,
    })
}

/// Fill in nakshatra data on positions the provider left blank.
/// Returns how many positions were annotated.
pub fn annotate_nakshatras(planets: &mut BTreeMap<Body, PlanetPosition>) -> Result<usize> {
    let mut annotated = 0;
    for pos in planets.values_mut().filter(|p| p.nakshatra.is_none()) {
        let meta = nakshatra_for_longitude(pos.longitude)?;
        pos.nakshatra = Some(NakshatraInfo {
            name: meta.name.to_string(),
            pada: meta.pada,
            lord: meta.lord.name().to_string(),
        });
        annotated += 1;
    }
    Ok(annotated)
}
