//! Error types for chart computation.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the pure chart functions.
///
/// The oracle surfaces never propagate these to end users; they are turned
/// into sentinel labels or the fallback chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    #[error("Invalid astronomical input: {field} = {value}")]
    InvalidAstronomicalInput { field: &'static str, value: String },
    #[error("Missing required chart data: {0}")]
    MissingData(&'static str),
    #[error("Evaluation instant {at} precedes birth instant {birth}")]
    BeforeBirth {
        birth: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    #[error("No dasha period contains {at} within {cycles} cycles of birth")]
    DashaOutOfRange { at: DateTime<Utc>, cycles: usize },
}

impl AstroError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        AstroError::InvalidAstronomicalInput {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T, E = AstroError> = std::result::Result<T, E>;
