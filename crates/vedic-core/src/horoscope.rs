//! Horoscope assembly: one aggregate record per chart request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::ephemeris::types::{sign_name, Body, EphemerisSnapshot, PlanetPosition};
use crate::error::Result;
use crate::vedic::dasha::{
    current_dasha, vimshottari_timeline, DashaLevel, DashaState, PeriodNode, DASHA_UNSYNCHRONIZED,
};
use crate::vedic::houses::{map_to_houses, HouseAssignment};
use crate::vedic::moon_phase::{synodic_phase, tithi_from_longitudes, MoonPhase};
use crate::vedic::nakshatra::annotate_nakshatras;
use crate::vedic::patterns::{match_patterns, KarmicPattern};
use crate::vedic::profile::{derive_profile, PsychologicalProfile};

/// Transiting bodies narrated in the computed hits, in narration order.
pub const DEFAULT_TRANSIT_WATCH: [Body; 5] =
    [Body::Saturn, Body::Jupiter, Body::Rahu, Body::Ketu, Body::Mars];

pub const FALLBACK_ASCENDANT: &str = "Aries";
pub const FALLBACK_DASHA: &str = "Unsynchronized (fallback)";
pub const UNKNOWN_SIGN: &str = "Unknown";

const HOUSE_MEANINGS: [&str; 12] = [
    "Self & Identity",
    "Wealth & Speech",
    "Courage & Communication",
    "Home & Inner Peace",
    "Creativity & Romance",
    "Conflict & Health",
    "Partnerships",
    "Crisis & Transformation",
    "Luck & Dharma",
    "Career & Status",
    "Gains & Networks",
    "Isolation & Liberation",
];

fn house_meaning(house: u8) -> &'static str {
    HOUSE_MEANINGS
        .get((house as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("Unknown Sector")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyOptions {
    pub transit_watch: Vec<Body>,
    pub dasha_depth: DashaLevel,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            transit_watch: DEFAULT_TRANSIT_WATCH.to_vec(),
            dasha_depth: DashaLevel::Antardasha,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoroscopeResult {
    pub ascendant: String,
    pub moon_sign: String,
    /// "Ma/Ra" style label, or a sentinel when unavailable
    pub dasha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dasha_periods: Option<DashaState>,
    #[serde(default)]
    pub dasha_timeline: Vec<PeriodNode>,
    pub planets: BTreeMap<Body, PlanetPosition>,
    pub houses: HouseAssignment,
    pub transits: BTreeMap<Body, PlanetPosition>,
    pub transit_houses: HouseAssignment,
    pub computed_hits: Vec<String>,
    pub profile: PsychologicalProfile,
    pub patterns: Vec<KarmicPattern>,
    /// Natal Moon phase: the provider's tithi, else the natal Sun/Moon
    /// elongation, else the synodic estimate at the birth instant (the
    /// evaluation instant when no birth instant is known).
    pub moon_phase: MoonPhase,
    /// Set when the chart is the placeholder served during provider failure
    pub fallback: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl HoroscopeResult {
    /// Fixed placeholder chart served when the ephemeris is unreachable or
    /// returns garbage.
    pub fn fallback(birth: Option<DateTime<Utc>>, at: DateTime<Utc>) -> Self {
        Self {
            ascendant: FALLBACK_ASCENDANT.to_string(),
            moon_sign: UNKNOWN_SIGN.to_string(),
            dasha: FALLBACK_DASHA.to_string(),
            dasha_periods: None,
            dasha_timeline: Vec::new(),
            planets: BTreeMap::new(),
            houses: HouseAssignment::default(),
            transits: BTreeMap::new(),
            transit_houses: HouseAssignment::default(),
            computed_hits: Vec::new(),
            profile: derive_profile(&BTreeMap::new(), &HouseAssignment::default()),
            patterns: Vec::new(),
            moon_phase: synodic_phase(phase_instant(birth, at)),
            fallback: true,
            evaluated_at: at,
        }
    }

    /// Short plain-text digest for chat and UI layers.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Ascendant: {} | Moon: {} | {}",
            self.ascendant, self.moon_sign, self.moon_phase
        );
        let _ = writeln!(out, "Dasha: {}", self.dasha);
        let _ = writeln!(
            out,
            "Strength: {} | Weakness: {} | Obsession: {}",
            self.profile.strength, self.profile.weakness, self.profile.obsession
        );
        for hit in &self.computed_hits {
            let _ = writeln!(out, "- {hit}");
        }
        for pattern in &self.patterns {
            let _ = writeln!(out, "[{}] {}", pattern.id, pattern.diagnosis);
        }
        if self.fallback {
            let _ = writeln!(out, "(placeholder chart: ephemeris offline)");
        }
        out
    }
}

/// Narrate transit houses for the watch list, then the natal houses of the
/// running dasha lords.
pub fn computed_hits(
    watch: &[Body],
    transit_houses: &HouseAssignment,
    natal_houses: &HouseAssignment,
    dasha: Option<&DashaState>,
) -> Vec<String> {
    let mut hits: Vec<String> = watch
        .iter()
        .filter_map(|body| {
            transit_houses.house_of(*body).map(|h| {
                format!("Transit {body} in house {h} ({})", house_meaning(h))
            })
        })
        .collect();

    if let Some(state) = dasha {
        let lords = [
            ("Mahadasha", state.mahadasha.lord),
            ("Antardasha", state.antardasha.lord),
        ];
        for (role, lord) in lords {
            if let Some(h) = natal_houses.house_of(lord) {
                hits.push(format!(
                    "{role} lord {lord} occupies natal house {h} ({})",
                    house_meaning(h)
                ));
            }
        }
    }
    hits
}

fn phase_instant(birth: Option<DateTime<Utc>>, at: DateTime<Utc>) -> DateTime<Utc> {
    birth.unwrap_or(at)
}

fn moon_phase_for(
    natal: &EphemerisSnapshot,
    planets: &BTreeMap<Body, PlanetPosition>,
    synodic_at: DateTime<Utc>,
) -> Result<MoonPhase> {
    if let Some(tithi) = natal.tithi {
        return MoonPhase::from_tithi(tithi);
    }
    match (planets.get(&Body::Sun), planets.get(&Body::Moon)) {
        (Some(sun), Some(moon)) => {
            MoonPhase::from_tithi(tithi_from_longitudes(sun.longitude, moon.longitude)?)
        }
        _ => Ok(synodic_phase(synodic_at)),
    }
}

/// Assemble the horoscope from a natal and a transit snapshot.
///
/// Transit houses are counted from the natal ascendant. A missing Moon or
/// birth instant leaves the dasha unsynchronized without failing the chart;
/// out-of-range signs and longitudes fail the whole assembly.
pub fn assemble_horoscope(
    natal: &EphemerisSnapshot,
    transit: &EphemerisSnapshot,
    birth: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
    options: &AssemblyOptions,
) -> Result<HoroscopeResult> {
    let mut planets = natal.positions()?;
    annotate_nakshatras(&mut planets)?;
    let ascendant_sign = natal.ascendant_sign()?;
    let house_signs = natal.house_signs(ascendant_sign)?;
    let houses = map_to_houses(&planets, ascendant_sign)?;

    let transits = transit.positions()?;
    let transit_houses = map_to_houses(&transits, ascendant_sign)?;

    let moon = planets.get(&Body::Moon);
    let (dasha_periods, dasha_timeline) = match (moon, birth) {
        (Some(moon), Some(birth)) => match current_dasha(moon.longitude, birth, at) {
            Ok(state) => {
                let timeline = vimshottari_timeline(moon.longitude, birth, options.dasha_depth)?;
                (Some(state), timeline)
            }
            Err(e) => {
                log::warn!("Dasha unsynchronized: {e}");
                (None, Vec::new())
            }
        },
        _ => (None, Vec::new()),
    };
    let dasha = dasha_periods
        .as_ref()
        .map(DashaState::label)
        .unwrap_or_else(|| DASHA_UNSYNCHRONIZED.to_string());

    let moon_sign = match moon {
        Some(m) => sign_name(m.sign)?.to_string(),
        None => UNKNOWN_SIGN.to_string(),
    };

    let result = HoroscopeResult {
        ascendant: sign_name(ascendant_sign)?.to_string(),
        moon_sign,
        computed_hits: computed_hits(
            &options.transit_watch,
            &transit_houses,
            &houses,
            dasha_periods.as_ref(),
        ),
        profile: derive_profile(&planets, &houses),
        patterns: match_patterns(&house_signs, &houses),
        moon_phase: moon_phase_for(natal, &planets, phase_instant(birth, at))?,
        dasha,
        dasha_periods,
        dasha_timeline,
        planets,
        houses,
        transits,
        transit_houses,
        fallback: false,
        evaluated_at: at,
    };
    log::debug!(
        "Assembled horoscope: {} rising, dasha {}, {} patterns",
        result.ascendant,
        result.dasha,
        result.patterns.len()
    );
    Ok(result)
}
