//! Psychological labels from the Sun sign and the Saturn and Rahu houses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ephemeris::types::{sign_name, Body, PlanetPosition};
use crate::vedic::houses::HouseAssignment;

pub const DEFAULT_STRENGTH: &str = "Latent Potential";
pub const DEFAULT_WEAKNESS: &str = "Hidden Fear";
pub const DEFAULT_OBSESSION: &str = "Secret Desire";

// keyed by Sun sign name
const STRENGTHS: [(&str, &str); 12] = [
    ("Aries", "Fearless Initiative"),
    ("Taurus", "Unshakable Endurance"),
    ("Gemini", "Quicksilver Intellect"),
    ("Cancer", "Protective Intuition"),
    ("Leo", "Natural Sovereignty"),
    ("Virgo", "Surgical Precision"),
    ("Libra", "Diplomatic Grace"),
    ("Scorpio", "Regenerative Intensity"),
    ("Sagittarius", "Visionary Faith"),
    ("Capricorn", "Strategic Discipline"),
    ("Aquarius", "Systemic Genius"),
    ("Pisces", "Boundless Empathy"),
];

// index = Saturn's house - 1
const WEAKNESSES: [&str; 12] = [
    "Self-Doubt Loop",
    "Scarcity Mindset",
    "Silenced Voice",
    "Emotional Drought",
    "Creative Paralysis",
    "Overwork Compulsion",
    "Fear of Commitment",
    "Dread of Loss",
    "Crisis of Faith",
    "Fear of Failure",
    "Social Isolation",
    "Karmic Exhaustion",
];

// index = Rahu's house - 1
const OBSESSIONS: [&str; 12] = [
    "Reinvention of Self",
    "Accumulation of Wealth",
    "Viral Influence",
    "The Perfect Sanctuary",
    "Fame and Applause",
    "Total Control",
    "The Ideal Partner",
    "Forbidden Knowledge",
    "Foreign Horizons",
    "Public Power",
    "Network Supremacy",
    "Escape and Transcendence",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychologicalProfile {
    pub strength: String,
    pub weakness: String,
    pub obsession: String,
}

fn by_house(table: &[&'static str; 12], house: Option<u8>, default: &'static str) -> &'static str {
    match house {
        Some(h @ 1..=12) => table[(h - 1) as usize],
        _ => default,
    }
}

/// Derive the profile. Missing data degrades to the named defaults.
pub fn derive_profile(
    planets: &BTreeMap<Body, PlanetPosition>,
    houses: &HouseAssignment,
) -> PsychologicalProfile {
    let strength = planets
        .get(&Body::Sun)
        .and_then(|sun| sign_name(sun.sign).ok())
        .and_then(|name| STRENGTHS.iter().find(|(sign, _)| *sign == name))
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_STRENGTH);

    PsychologicalProfile {
        strength: strength.to_string(),
        weakness: by_house(&WEAKNESSES, houses.house_of(Body::Saturn), DEFAULT_WEAKNESS)
            .to_string(),
        obsession: by_house(&OBSESSIONS, houses.house_of(Body::Rahu), DEFAULT_OBSESSION)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leo_sun_is_sovereign() {
        let mut planets = BTreeMap::new();
        planets.insert(Body::Sun, PlanetPosition { sign: 5, longitude: 130.0, nakshatra: None });
        let houses: HouseAssignment = [(Body::Saturn, 10), (Body::Rahu, 7)].into_iter().collect();
        let profile = derive_profile(&planets, &houses);
        assert_eq!(profile.strength, "Natural Sovereignty");
        assert_eq!(profile.weakness, "Fear of Failure");
        assert_eq!(profile.obsession, "The Ideal Partner");
    }

    #[test]
    fn test_missing_data_uses_defaults() {
        let profile = derive_profile(&BTreeMap::new(), &HouseAssignment::default());
        assert_eq!(profile.strength, DEFAULT_STRENGTH);
        assert_eq!(profile.weakness, DEFAULT_WEAKNESS);
        assert_eq!(profile.obsession, DEFAULT_OBSESSION);
    }

    #[test]
    fn test_unassigned_house_uses_default() {
        let houses: HouseAssignment = [(Body::Saturn, 0)].into_iter().collect();
        let profile = derive_profile(&BTreeMap::new(), &houses);
        assert_eq!(profile.weakness, DEFAULT_WEAKNESS);
    }
}
