use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use vedic_core::{EphemerisProvider, EphemerisSnapshot, ProviderError};

/// Replays saved provider responses. The natal file answers for the birth
/// instant, the transit file for every other instant.
#[derive(Debug, Clone)]
pub struct FileEphemeris {
    natal: PathBuf,
    transit: PathBuf,
    birth: DateTime<Utc>,
}

impl FileEphemeris {
    pub fn new(natal: PathBuf, transit: PathBuf, birth: DateTime<Utc>) -> Self {
        Self {
            natal,
            transit,
            birth,
        }
    }
}

#[async_trait]
impl EphemerisProvider for FileEphemeris {
    fn name(&self) -> &str {
        "file"
    }

    async fn chart_at(
        &self,
        instant: DateTime<Utc>,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<EphemerisSnapshot, ProviderError> {
        let path = if instant == self.birth {
            &self.natal
        } else {
            &self.transit
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", path.display())))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_natal_and_transit() {
        let mut natal = tempfile::NamedTempFile::new().unwrap();
        let natal_json = r#"{"planets":{"Mo":{"sign":2,"longitude":45.0}},"ascendant":4}"#;
        write!(natal, "{natal_json}").unwrap();
        let mut transit = tempfile::NamedTempFile::new().unwrap();
        write!(transit, r#"{{"planets":{{"Sa":{{"sign":11,"longitude":305.0}}}}}}"#).unwrap();

        let birth = Utc.with_ymd_and_hms(1990, 5, 17, 4, 30, 0).unwrap();
        let provider = FileEphemeris::new(
            natal.path().to_path_buf(),
            transit.path().to_path_buf(),
            birth,
        );

        let n = provider.chart_at(birth, 0.0, 0.0).await.unwrap();
        assert_eq!(n.ascendant, Some(4));
        assert!(n.planets.contains_key("Mo"));

        let t = provider.chart_at(Utc::now(), 0.0, 0.0).await.unwrap();
        assert!(t.planets.contains_key("Sa"));
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files() {
        let birth = Utc.with_ymd_and_hms(1990, 5, 17, 4, 30, 0).unwrap();
        let missing = FileEphemeris::new(
            "/nonexistent/natal.json".into(),
            "/nonexistent/transit.json".into(),
            birth,
        );
        assert!(matches!(
            missing.chart_at(birth, 0.0, 0.0).await,
            Err(ProviderError::Unavailable(_))
        ));

        let mut junk = tempfile::NamedTempFile::new().unwrap();
        write!(junk, "not json").unwrap();
        let malformed =
            FileEphemeris::new(junk.path().to_path_buf(), junk.path().to_path_buf(), birth);
        assert!(matches!(
            malformed.chart_at(birth, 0.0, 0.0).await,
            Err(ProviderError::Malformed(_))
        ));
    }
}
