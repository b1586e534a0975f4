//! Sign rulers for Vedic astrology.
//!
//! Maps each rashi to its graha lord. Mars, Venus, Mercury, Jupiter and
//! Saturn rule two signs each; the luminaries rule one; the nodes none.

use crate::ephemeris::types::{validate_sign, Body};
use crate::error::Result;
use crate::vedic::houses::HouseSigns;

const SIGN_LORDS: [Body; 12] = [
    Body::Mars,    // Aries
    Body::Venus,   // Taurus
    Body::Mercury, // Gemini
    Body::Moon,    // Cancer
    Body::Sun,     // Leo
    Body::Mercury, // Virgo
    Body::Venus,   // Libra
    Body::Mars,    // Scorpio
    Body::Jupiter, // Sagittarius
    Body::Saturn,  // Capricorn
    Body::Saturn,  // Aquarius
    Body::Jupiter, // Pisces
];

/// Lord of a sign (1..=12)
pub fn sign_lord(sign: u8) -> Result<Body> {
    let sign = validate_sign("sign", sign)?;
    Ok(SIGN_LORDS[(sign - 1) as usize])
}

/// Lord of a house, given the chart's house-to-sign table.
pub fn house_lord(house_signs: &HouseSigns, house: u8) -> Option<Body> {
    house_signs.sign_of(house).and_then(|s| sign_lord(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_lord() {
        assert_eq!(sign_lord(1).unwrap(), Body::Mars);
        assert_eq!(sign_lord(4).unwrap(), Body::Moon);
        assert_eq!(sign_lord(5).unwrap(), Body::Sun);
        assert_eq!(sign_lord(11).unwrap(), Body::Saturn);
        assert!(sign_lord(0).is_err());
    }

    #[test]
    fn test_every_lord_count() {
        let count = |b: Body| SIGN_LORDS.iter().filter(|l| **l == b).count();
        assert_eq!(count(Body::Mercury), 2);
        assert_eq!(count(Body::Saturn), 2);
        assert_eq!(count(Body::Sun), 1);
        assert_eq!(count(Body::Rahu), 0);
    }

    #[test]
    fn test_house_lord_from_whole_sign() {
        // Leo rising: 10th house is Taurus, ruled by Venus
        let signs = HouseSigns::whole_sign(5).unwrap();
        assert_eq!(house_lord(&signs, 10), Some(Body::Venus));
        assert_eq!(house_lord(&signs, 13), None);
    }
}
