pub mod dasha;
pub mod houses;
pub mod moon_phase;
pub mod nakshatra;
pub mod patterns;
pub mod profile;
pub mod rulers;

pub use dasha::{
    calculate_dasha, calculate_dasha_at, current_dasha, vimshottari_timeline, DashaLevel,
    DashaState,
    PeriodNode, DASHA_UNSYNCHRONIZED,
};
pub use houses::{map_to_house, map_to_houses, HouseAssignment, HouseSigns};
pub use moon_phase::{synodic_phase, tithi_from_longitudes, MoonPhase};
pub use nakshatra::{annotate_nakshatras, nakshatra_for_longitude, NakshatraMetadata};
pub use patterns::{match_patterns, KarmicPattern, PatternCategory, PATTERN_CATALOG};
pub use profile::{derive_profile, PsychologicalProfile};
pub use rulers::{house_lord, sign_lord};
