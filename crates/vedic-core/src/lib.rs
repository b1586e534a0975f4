//! Chart engine for the theg0d oracle: house mapping, Vimshottari dashas,
//! psychological profile and karmic pattern matching over ephemeris data
//! supplied by an external provider.

pub mod ephemeris;
pub mod error;
pub mod horoscope;
pub mod oracle;
pub mod vedic;

pub use ephemeris::{
    BirthData, Body, EphemerisProvider, EphemerisSnapshot, PlanetPosition, ProviderError,
};
pub use error::{AstroError, Result};
pub use horoscope::{assemble_horoscope, AssemblyOptions, HoroscopeResult};
pub use oracle::{Oracle, OracleError};
