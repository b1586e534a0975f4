//! Vimshottari dasha calculations for Vedic astrology.
//!
//! Dashas are time periods ruled by planets, seeded by the nakshatra the
//! Moon occupied at birth. The nine lords follow a fixed 120-year cycle; each
//! period subdivides into nine sub-periods in the same cyclic order, starting
//! from the period's own lord, with lengths proportional to the lords' years.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ephemeris::types::{validate_longitude, Body};
use crate::error::{AstroError, Result};
use crate::vedic::nakshatra::NAKSHATRA_SEGMENT_SIZE;

pub const VIMSHOTTARI_TOTAL_YEARS: f64 = 120.0;
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Full 120-year cycles walked before giving up on an evaluation instant.
pub const MAX_CYCLES: usize = 20;
/// Label returned when the dasha cannot be computed.
pub const DASHA_UNSYNCHRONIZED: &str = "Unsynchronized";

const MS_PER_DAY: f64 = 86_400_000.0;

pub const VIMSHOTTARI_SEQUENCE: [(Body, f64); 9] = [
    (Body::Ketu, 7.0),
    (Body::Venus, 20.0),
    (Body::Sun, 6.0),
    (Body::Moon, 10.0),
    (Body::Mars, 7.0),
    (Body::Rahu, 18.0),
    (Body::Jupiter, 16.0),
    (Body::Saturn, 19.0),
    (Body::Mercury, 17.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    Antardasha,
    Pratyantardasha,
}

impl DashaLevel {
    pub fn child(self) -> Option<DashaLevel> {
        match self {
            DashaLevel::Mahadasha => Some(DashaLevel::Antardasha),
            DashaLevel::Antardasha => Some(DashaLevel::Pratyantardasha),
            DashaLevel::Pratyantardasha => None,
        }
    }
}

impl FromStr for DashaLevel {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mahadasha" | "maha" => Ok(DashaLevel::Mahadasha),
            "antardasha" | "antar" | "bhukti" => Ok(DashaLevel::Antardasha),
            "pratyantardasha" | "pratyantar" => Ok(DashaLevel::Pratyantardasha),
            _ => Err(AstroError::invalid("dasha level", s)),
        }
    }
}

/// One dasha period. Children, when present, tile `[start, end)` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodNode {
    pub lord: Body,
    pub level: DashaLevel,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PeriodNode>,
}

impl PeriodNode {
    fn leaf(lord: Body, level: DashaLevel, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            lord,
            level,
            start,
            end,
            children: Vec::new(),
        }
    }

    /// Half-open containment: `start <= t < end`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    pub fn duration_years(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / MS_PER_DAY / DAYS_PER_YEAR
    }

    /// The nine sub-periods of this node, beginning with its own lord.
    /// Empty for the deepest level.
    pub fn sub_periods(&self) -> Vec<PeriodNode> {
        let Some(level) = self.level.child() else {
            return Vec::new();
        };
        let start_index = sequence_index(self.lord);
        let span_ms = (self.end - self.start).num_milliseconds() as f64;
        let mut fraction = 0.0;
        let mut child_start = self.start;
        let mut children = Vec::with_capacity(VIMSHOTTARI_SEQUENCE.len());

        for offset in 0..VIMSHOTTARI_SEQUENCE.len() {
            let (lord, years) =
                VIMSHOTTARI_SEQUENCE[(start_index + offset) % VIMSHOTTARI_SEQUENCE.len()];
            fraction += years / VIMSHOTTARI_TOTAL_YEARS;
            // the last child closes on the parent's end so rounding never leaves a gap
            let child_end = if offset == VIMSHOTTARI_SEQUENCE.len() - 1 {
                self.end
            } else {
                self.start + Duration::milliseconds((span_ms * fraction).round() as i64)
            };
            children.push(PeriodNode::leaf(lord, level, child_start, child_end));
            child_start = child_end;
        }
        children
    }

    /// Populate children recursively down to `depth`.
    pub fn expand(mut self, depth: DashaLevel) -> Self {
        if self.level < depth {
            self.children = self
                .sub_periods()
                .into_iter()
                .map(|c| c.expand(depth))
                .collect();
        }
        self
    }

    /// Chain of nodes containing `t`, from this node down through its
    /// populated children.
    pub fn active_path(&self, t: DateTime<Utc>) -> Vec<&PeriodNode> {
        let mut path = Vec::new();
        let mut node = self;
        if !node.contains(t) {
            return path;
        }
        path.push(node);
        while let Some(child) = node.children.iter().find(|c| c.contains(t)) {
            path.push(child);
            node = child;
        }
        path
    }
}

/// Where the Moon's nakshatra puts the native in the cycle at birth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BirthBalance {
    pub nakshatra_index: usize,
    /// Index into `VIMSHOTTARI_SEQUENCE` of the birth mahadasha lord
    pub sequence_index: usize,
    pub lord: Body,
    /// Years of the birth mahadasha still to run at birth
    pub balance_years: f64,
}

impl BirthBalance {
    pub fn elapsed_years(&self) -> f64 {
        VIMSHOTTARI_SEQUENCE[self.sequence_index].1 - self.balance_years
    }
}

fn sequence_index(lord: Body) -> usize {
    VIMSHOTTARI_SEQUENCE
        .iter()
        .position(|(b, _)| *b == lord)
        .unwrap_or(0)
}

fn years_to_duration(years: f64) -> Duration {
    Duration::milliseconds((years * DAYS_PER_YEAR * MS_PER_DAY).round() as i64)
}

/// `t` shifted by `years` (negative goes back). Fails instead of leaving
/// chrono's representable range.
fn shift_years(t: DateTime<Utc>, years: f64) -> Result<DateTime<Utc>> {
    t.checked_add_signed(years_to_duration(years))
        .ok_or_else(|| AstroError::invalid("birth", t))
}

/// Starting lord and remaining years of the birth mahadasha.
pub fn birth_balance(moon_longitude: f64) -> Result<BirthBalance> {
    let lon = validate_longitude("moon longitude", moon_longitude)?;
    let nakshatra_index = ((lon / NAKSHATRA_SEGMENT_SIZE).floor() as usize).min(26);
    let sequence_index = nakshatra_index % VIMSHOTTARI_SEQUENCE.len();
    let (lord, years) = VIMSHOTTARI_SEQUENCE[sequence_index];
    let traversed =
        (lon - nakshatra_index as f64 * NAKSHATRA_SEGMENT_SIZE) / NAKSHATRA_SEGMENT_SIZE;

    Ok(BirthBalance {
        nakshatra_index,
        sequence_index,
        lord,
        balance_years: years * (1.0 - traversed),
    })
}

/// The birth mahadasha, anchored at its nominal start so that its
/// sub-periods line up with the full cycle. It ends `balance_years` after birth.
fn birth_mahadasha(balance: &BirthBalance, birth: DateTime<Utc>) -> Result<PeriodNode> {
    Ok(PeriodNode::leaf(
        balance.lord,
        DashaLevel::Mahadasha,
        shift_years(birth, -balance.elapsed_years())?,
        shift_years(birth, balance.balance_years)?,
    ))
}

fn next_mahadasha(balance: &BirthBalance, step: usize, start: DateTime<Utc>) -> Result<PeriodNode> {
    let (lord, years) =
        VIMSHOTTARI_SEQUENCE[(balance.sequence_index + step) % VIMSHOTTARI_SEQUENCE.len()];
    Ok(PeriodNode::leaf(lord, DashaLevel::Mahadasha, start, shift_years(start, years)?))
}

/// Walk the mahadashas forward from birth until one contains `at`.
pub fn mahadasha_at(
    moon_longitude: f64,
    birth: DateTime<Utc>,
    at: DateTime<Utc>,
) -> Result<PeriodNode> {
    if at < birth {
        return Err(AstroError::BeforeBirth { birth, at });
    }
    let balance = birth_balance(moon_longitude)?;
    let mut period = birth_mahadasha(&balance, birth)?;

    for step in 1..=MAX_CYCLES * VIMSHOTTARI_SEQUENCE.len() {
        if at < period.end {
            return Ok(period);
        }
        period = next_mahadasha(&balance, step, period.end)?;
    }
    Err(AstroError::DashaOutOfRange { at, cycles: MAX_CYCLES })
}

/// Active mahadasha and antardasha at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaState {
    pub mahadasha: PeriodNode,
    pub antardasha: PeriodNode,
}

impl DashaState {
    /// "Mahadasha/Antardasha" in two-letter codes, e.g. "Ju/Sa".
    pub fn label(&self) -> String {
        format!("{}/{}", self.mahadasha.lord.code(), self.antardasha.lord.code())
    }
}

impl fmt::Display for DashaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub fn current_dasha(
    moon_longitude: f64,
    birth: DateTime<Utc>,
    at: DateTime<Utc>,
) -> Result<DashaState> {
    let mahadasha = mahadasha_at(moon_longitude, birth, at)?;
    let antardasha = mahadasha
        .sub_periods()
        .into_iter()
        .find(|p| p.contains(at))
        .ok_or(AstroError::DashaOutOfRange { at, cycles: MAX_CYCLES })?;
    log::debug!(
        "Dasha at {at}: {}/{} (maha {} - {})",
        mahadasha.lord,
        antardasha.lord,
        mahadasha.start,
        mahadasha.end
    );
    Ok(DashaState { mahadasha, antardasha })
}

/// Total dasha label: any missing or invalid input yields
/// [`DASHA_UNSYNCHRONIZED`] instead of an error.
pub fn calculate_dasha_at(
    moon_longitude: Option<f64>,
    birth: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> String {
    let (Some(lon), Some(birth)) = (moon_longitude, birth) else {
        return DASHA_UNSYNCHRONIZED.to_string();
    };
    match current_dasha(lon, birth, at) {
        Ok(state) => state.label(),
        Err(e) => {
            log::warn!("Dasha unsynchronized: {e}");
            DASHA_UNSYNCHRONIZED.to_string()
        }
    }
}

/// [`calculate_dasha_at`] evaluated now.
pub fn calculate_dasha(moon_longitude: Option<f64>, birth: Option<DateTime<Utc>>) -> String {
    calculate_dasha_at(moon_longitude, birth, Utc::now())
}

/// The nine mahadashas from birth, expanded to `depth`.
pub fn vimshottari_timeline(
    moon_longitude: f64,
    birth: DateTime<Utc>,
    depth: DashaLevel,
) -> Result<Vec<PeriodNode>> {
    let balance = birth_balance(moon_longitude)?;
    let mut periods = Vec::with_capacity(VIMSHOTTARI_SEQUENCE.len());
    let mut period = birth_mahadasha(&balance, birth)?;

    for step in 1..VIMSHOTTARI_SEQUENCE.len() {
        let next = next_mahadasha(&balance, step, period.end)?;
        periods.push(period.expand(depth));
        period = next;
    }
    periods.push(period.expand(depth));
    Ok(periods)
}
