//! Sign-to-house remapping (whole-sign bhavas).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ephemeris::types::{validate_sign, Body, PlanetPosition};
use crate::error::{AstroError, Result};

/// House (1..=12) of a sign counted from the ascendant sign.
pub fn map_to_house(sign: u8, ascendant_sign: u8) -> Result<u8> {
    let sign = validate_sign("sign", sign)? as i16;
    let asc = validate_sign("ascendant", ascendant_sign)? as i16;
    let mut house = sign - asc + 1;
    if house <= 0 {
        house += 12;
    }
    Ok(house as u8)
}

/// Planet to house (1..=12) for one chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseAssignment(BTreeMap<Body, u8>);

impl HouseAssignment {
    pub fn house_of(&self, body: Body) -> Option<u8> {
        self.0.get(&body).copied()
    }
}

impl FromIterator<(Body, u8)> for HouseAssignment {
    fn from_iter<T: IntoIterator<Item = (Body, u8)>>(iter: T) -> Self {
        HouseAssignment(iter.into_iter().collect())
    }
}

/// Map every position to its house relative to `ascendant_sign`.
///
/// Transit positions are mapped against the natal ascendant.
pub fn map_to_houses(
    planets: &BTreeMap<Body, PlanetPosition>,
    ascendant_sign: u8,
) -> Result<HouseAssignment> {
    planets
        .iter()
        .map(|(body, pos)| map_to_house(pos.sign, ascendant_sign).map(|h| (*body, h)))
        .collect()
}

/// Sign occupying each house, index 0 = house 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseSigns([u8; 12]);

impl HouseSigns {
    /// Whole-sign houses: house 1 is the ascendant sign, then in zodiac order.
    pub fn whole_sign(ascendant_sign: u8) -> Result<Self> {
        let asc = validate_sign("ascendant", ascendant_sign)?;
        let mut signs = [0u8; 12];
        for (i, slot) in signs.iter_mut().enumerate() {
            *slot = (asc - 1 + i as u8) % 12 + 1;
        }
        Ok(HouseSigns(signs))
    }

    /// An empty table; every lookup misses.
    pub fn unknown() -> Self {
        HouseSigns([0; 12])
    }

    pub fn sign_of(&self, house: u8) -> Option<u8> {
        if !(1..=12).contains(&house) {
            return None;
        }
        match self.0[(house - 1) as usize] {
            0 => None,
            s => Some(s),
        }
    }
}

impl TryFrom<[u8; 12]> for HouseSigns {
    type Error = AstroError;

    fn try_from(signs: [u8; 12]) -> Result<Self> {
        for s in signs {
            validate_sign("house sign", s)?;
        }
        Ok(HouseSigns(signs))
    }
}
