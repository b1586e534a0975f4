use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use vedic_core::ephemeris::{HouseCusp, StaticEphemeris};
use vedic_core::horoscope::{FALLBACK_ASCENDANT, FALLBACK_DASHA};
use vedic_core::{
    AssemblyOptions, BirthData, EphemerisProvider, EphemerisSnapshot, Oracle, OracleError,
    PlanetPosition, ProviderError,
};

struct DownProvider;

#[async_trait]
impl EphemerisProvider for DownProvider {
    fn name(&self) -> &str {
        "down"
    }

    async fn chart_at(
        &self,
        _instant: DateTime<Utc>,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<EphemerisSnapshot, ProviderError> {
        Err(ProviderError::Status { code: 500 })
    }
}

fn birth() -> BirthData {
    BirthData {
        instant: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        latitude: 28.61,
        longitude: 77.21,
    }
}

fn natal() -> EphemerisSnapshot {
    let mut snap = EphemerisSnapshot::default();
    snap.houses.insert("1".to_string(), HouseCusp { sign: 4 });
    snap.planets.insert(
        "Mo".to_string(),
        PlanetPosition { sign: 2, longitude: 45.0, nakshatra: None },
    );
    snap.planets.insert(
        "Sa".to_string(),
        PlanetPosition { sign: 10, longitude: 280.0, nakshatra: None },
    );
    snap
}

#[tokio::test]
async fn test_provider_failure_serves_fallback() {
    let oracle = Oracle::new(DownProvider, AssemblyOptions::default());
    let result = oracle.horoscope(&birth()).await;
    assert!(result.fallback);
    assert_eq!(result.ascendant, FALLBACK_ASCENDANT);
    assert_eq!(result.dasha, FALLBACK_DASHA);
    assert!(result.patterns.is_empty());
}

#[tokio::test]
async fn test_try_horoscope_exposes_fault() {
    let oracle = Oracle::new(DownProvider, AssemblyOptions::default());
    let err = oracle.try_horoscope(&birth(), Utc::now()).await.unwrap_err();
    assert!(matches!(err, OracleError::Provider(ProviderError::Status { code: 500 })));
}

#[tokio::test]
async fn test_malformed_snapshot_serves_fallback() {
    let mut bad = natal();
    bad.houses.insert("1".to_string(), HouseCusp { sign: 0 });
    let provider = StaticEphemeris::new(bad, EphemerisSnapshot::default(), birth().instant);
    let oracle = Oracle::new(provider, AssemblyOptions::default());
    let result = oracle.horoscope(&birth()).await;
    assert!(result.fallback);
}

#[tokio::test]
async fn test_static_chart_end_to_end() {
    let mut transit = EphemerisSnapshot::default();
    transit.planets.insert(
        "Ra".to_string(),
        PlanetPosition { sign: 1, longitude: 12.0, nakshatra: None },
    );
    let provider = StaticEphemeris::new(natal(), transit, birth().instant);
    let oracle = Oracle::new(provider, AssemblyOptions::default());
    let at = Utc.with_ymd_and_hms(2010, 3, 1, 0, 0, 0).unwrap();
    let result = oracle.horoscope_at(&birth(), at).await;

    assert!(!result.fallback);
    assert_eq!(result.ascendant, "Cancer");
    // Saturn in Capricorn with Cancer rising sits in the 7th
    assert_eq!(result.houses.house_of(vedic_core::Body::Saturn), Some(7));
    assert!(result.patterns.iter().any(|p| p.id == "karmic_blockage"));
    // Transit Rahu in Aries is the 10th from Cancer
    assert_eq!(result.computed_hits[0], "Transit Rahu in house 10 (Career & Status)");
    // Moon dasha ends 2006-04, Mars runs to 2013-04
    assert!(result.dasha.starts_with("Ma/"));
}
