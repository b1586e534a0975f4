pub mod provider;
pub mod types;

pub use provider::{BirthData, EphemerisProvider, ProviderError, StaticEphemeris};
pub use types::{
    sign_from_longitude, sign_name, validate_longitude, validate_sign, Body, EphemerisSnapshot,
    HouseCusp, NakshatraInfo, PlanetPosition, SIGN_NAMES,
};
