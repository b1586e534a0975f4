//! Karmic pattern catalog and matcher.
//!
//! Each rule pairs a house-placement condition with a diagnosis and a
//! remedy. Matching never mutates the catalog and returns hits in catalog
//! order (career, love, wealth).

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::ephemeris::types::Body;
use crate::vedic::houses::{HouseAssignment, HouseSigns};
use crate::vedic::rulers::house_lord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Career,
    Love,
    Wealth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarmicPattern {
    pub id: Cow<'static, str>,
    pub category: PatternCategory,
    pub diagnosis: Cow<'static, str>,
    pub solution: Cow<'static, str>,
}

/// Placement test evaluated against a chart's house assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The body occupies one of the houses.
    BodyIn(Body, &'static [u8]),
    /// The lord of `house` occupies one of `houses`.
    LordIn { house: u8, houses: &'static [u8] },
}

impl Condition {
    pub fn holds(&self, house_signs: &HouseSigns, assignment: &HouseAssignment) -> bool {
        let occupies = |body: Body, houses: &[u8]| {
            assignment
                .house_of(body)
                .is_some_and(|h| houses.contains(&h))
        };
        match *self {
            Condition::BodyIn(body, houses) => occupies(body, houses),
            Condition::LordIn { house, houses } => {
                house_lord(house_signs, house).is_some_and(|lord| occupies(lord, houses))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternRule {
    pub condition: Condition,
    pub description: &'static str,
    pub pattern: KarmicPattern,
}

const fn rule(
    id: &'static str,
    category: PatternCategory,
    condition: Condition,
    description: &'static str,
    diagnosis: &'static str,
    solution: &'static str,
) -> PatternRule {
    PatternRule {
        condition,
        description,
        pattern: KarmicPattern {
            id: Cow::Borrowed(id),
            category,
            diagnosis: Cow::Borrowed(diagnosis),
            solution: Cow::Borrowed(solution),
        },
    }
}

use PatternCategory::{Career, Love, Wealth};

pub static PATTERN_CATALOG: [PatternRule; 11] = [
    rule(
        "career_stagnation",
        Career,
        Condition::LordIn { house: 10, houses: &[8, 12] },
        "10th-house lord resides in house 8 or 12",
        "Your karma engine stalls in hidden rooms. Recognition arrives late and through back doors.",
        "Work behind the scenes first. Build in research, infrastructure or foreign markets before claiming the stage.",
    ),
    rule(
        "authority_clash",
        Career,
        Condition::BodyIn(Body::Sun, &[6, 8, 12]),
        "Sun in house 6, 8 or 12",
        "Bosses read your light as a threat. Hierarchies grind against your ego.",
        "Serve the mission rather than the manager. Offer water to the rising Sun on Sundays.",
    ),
    rule(
        "restless_ambition",
        Career,
        Condition::BodyIn(Body::Rahu, &[10]),
        "Rahu in house 10",
        "Hunger for status outruns your foundations. Titles feel hollow the moment you win them.",
        "Pick one summit and stay on it. Measure progress in craft, not in followers.",
    ),
    rule(
        "karmic_blockage",
        Love,
        Condition::BodyIn(Body::Saturn, &[7]),
        "Saturn in house 7",
        "Partnerships arrive as tests. Love is delayed until you stop treating it as a debt.",
        "Choose maturity over chemistry. Commit after thirty; honour elders and keep Saturday promises.",
    ),
    rule(
        "volatile_passion",
        Love,
        Condition::BodyIn(Body::Mars, &[7, 8]),
        "Mars in house 7 or 8",
        "Desire and conflict share one wire. Relationships ignite fast and burn out faster.",
        "Channel the fire into shared physical work. Never negotiate with your partner while angry.",
    ),
    rule(
        "illusory_attachment",
        Love,
        Condition::BodyIn(Body::Rahu, &[7]),
        "Rahu in house 7",
        "You fall for projections, not people. The partner you chase is an avatar you coded yourself.",
        "Audit the fantasy. Ask what the person does, not how they make you feel.",
    ),
    rule(
        "romantic_debt",
        Love,
        Condition::LordIn { house: 7, houses: &[6, 8, 12] },
        "7th-house lord resides in house 6, 8 or 12",
        "Unfinished contracts from past cycles shadow your unions. Love costs more than it pays.",
        "Settle old scores quietly. Give without keeping a ledger and the ledger closes itself.",
    ),
    rule(
        "unconventional_gains",
        Wealth,
        Condition::BodyIn(Body::Rahu, &[2, 11]),
        "Rahu in house 2 or 11",
        "Money flows through disruption: tech, foreign networks, speculative edges.",
        "Ride the anomaly but hedge it. Keep one boring asset for every wild bet.",
    ),
    rule(
        "wealth_drain",
        Wealth,
        Condition::LordIn { house: 2, houses: &[6, 8, 12] },
        "2nd-house lord resides in house 6, 8 or 12",
        "Savings leak through debts, hospitals and hidden expenses.",
        "Automate saving before spending. Donate a fixed share so the leak has a chosen outlet.",
    ),
    rule(
        "delayed_harvest",
        Wealth,
        Condition::BodyIn(Body::Saturn, &[2, 11]),
        "Saturn in house 2 or 11",
        "Wealth compounds slowly and only after forty. Shortcuts are punished.",
        "Play the long game. Steady, dull, compounding investments are your cheat code.",
    ),
    rule(
        "abundant_grace",
        Wealth,
        Condition::BodyIn(Body::Jupiter, &[2, 11]),
        "Jupiter in house 2 or 11",
        "Fortune follows your teaching. Resources arrive through mentors and wise networks.",
        "Share knowledge freely. Every student you raise becomes a channel of gain.",
    ),
];

/// All catalog patterns whose condition holds, in catalog order.
pub fn match_patterns(
    house_signs: &HouseSigns,
    assignment: &HouseAssignment,
) -> Vec<KarmicPattern> {
    PATTERN_CATALOG
        .iter()
        .filter(|r| r.condition.holds(house_signs, assignment))
        .map(|r| r.pattern.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(Body, u8)]) -> HouseAssignment {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_saturn_in_seventh_is_karmic_blockage() {
        let hits = match_patterns(&HouseSigns::unknown(), &assignment(&[(Body::Saturn, 7)]));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "karmic_blockage");
        assert_eq!(hits[0].category, PatternCategory::Love);
    }

    #[test]
    fn test_saturn_in_seventh_with_known_houses() {
        for asc in 1..=12 {
            let signs = HouseSigns::whole_sign(asc).unwrap();
            let hits = match_patterns(&signs, &assignment(&[(Body::Saturn, 7)]));
            let ids: Vec<_> = hits.iter().map(|p| p.id.as_ref()).collect();
            assert!(ids.contains(&"karmic_blockage"), "asc {asc}: {ids:?}");
        }
    }

    #[test]
    fn test_house_lord_rule() {
        // Leo rising: 10th is Taurus, Venus rules it
        let signs = HouseSigns::whole_sign(5).unwrap();
        let hits = match_patterns(&signs, &assignment(&[(Body::Venus, 12)]));
        let ids: Vec<_> = hits.iter().map(|p| p.id.as_ref()).collect();
        assert_eq!(ids, vec!["career_stagnation"]);
    }

    #[test]
    fn test_catalog_order_and_idempotence() {
        let chart = assignment(&[(Body::Rahu, 11), (Body::Saturn, 7), (Body::Sun, 12)]);
        let first = match_patterns(&HouseSigns::unknown(), &chart);
        let second = match_patterns(&HouseSigns::unknown(), &chart);
        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|p| p.id.as_ref()).collect();
        assert_eq!(ids, vec!["authority_clash", "karmic_blockage", "unconventional_gains"]);
    }

    #[test]
    fn test_empty_chart_matches_nothing() {
        assert!(match_patterns(&HouseSigns::unknown(), &HouseAssignment::default()).is_empty());
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = PATTERN_CATALOG.iter().map(|r| r.pattern.id.as_ref()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), PATTERN_CATALOG.len());
    }
}
