use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ephemeris::provider::{BirthData, EphemerisProvider, ProviderError};
use crate::error::AstroError;
use crate::horoscope::{assemble_horoscope, AssemblyOptions, HoroscopeResult};

#[derive(Error, Debug)]
pub enum OracleError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Chart(#[from] AstroError),
}

/// Always-available chart service: fetches natal and transit snapshots and
/// assembles them, serving the placeholder chart on any upstream fault.
pub struct Oracle<P> {
    provider: P,
    options: AssemblyOptions,
}

impl<P: EphemerisProvider> Oracle<P> {
    pub fn new(provider: P, options: AssemblyOptions) -> Self {
        Self { provider, options }
    }

    pub async fn horoscope(&self, birth: &BirthData) -> HoroscopeResult {
        self.horoscope_at(birth, Utc::now()).await
    }

    pub async fn horoscope_at(&self, birth: &BirthData, at: DateTime<Utc>) -> HoroscopeResult {
        match self.try_horoscope(birth, at).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("{}: serving fallback chart: {e}", self.provider.name());
                HoroscopeResult::fallback(Some(birth.instant), at)
            }
        }
    }

    /// Fallible variant for callers that want the fault.
    pub async fn try_horoscope(
        &self,
        birth: &BirthData,
        at: DateTime<Utc>,
    ) -> Result<HoroscopeResult, OracleError> {
        let natal = self
            .provider
            .chart_at(birth.instant, birth.latitude, birth.longitude)
            .await?;
        let transit = self
            .provider
            .chart_at(at, birth.latitude, birth.longitude)
            .await?;
        Ok(assemble_horoscope(&natal, &transit, Some(birth.instant), at, &self.options)?)
    }
}
