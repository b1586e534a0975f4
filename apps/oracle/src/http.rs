//! Async HTTP client for the remote astrology API.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use oracle_config::ProviderSettings;
use reqwest::Client;
use serde::Serialize;

use vedic_core::{EphemerisProvider, EphemerisSnapshot, ProviderError};

const API_KEY_HEADER: &str = "x-api-key";

/// Body of `POST {base_url}/chart`.
#[derive(Debug, Serialize)]
struct ChartRequest<'a> {
    datetime: String,
    latitude: f64,
    longitude: f64,
    ayanamsa: &'a str,
}

/// JSON chart provider. Clones share one connection pool.
#[derive(Clone)]
pub struct HttpEphemeris {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    ayanamsa: String,
}

impl HttpEphemeris {
    pub fn new(settings: &ProviderSettings, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key,
            ayanamsa: settings.ayanamsa.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    fn request_body(
        &self,
        instant: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> ChartRequest<'_> {
        ChartRequest {
            datetime: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            latitude,
            longitude,
            ayanamsa: &self.ayanamsa,
        }
    }
}

#[async_trait]
impl EphemerisProvider for HttpEphemeris {
    fn name(&self) -> &str {
        "http"
    }

    /// `POST /chart`
    async fn chart_at(
        &self,
        instant: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> Result<EphemerisSnapshot, ProviderError> {
        let resp = self
            .auth(self.client.post(self.url("/chart")))
            .json(&self.request_body(instant, latitude, longitude))
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                code: status.as_u16(),
            });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let snapshot: EphemerisSnapshot = serde_json::from_slice(&bytes)?;
        log::debug!(
            "http: chart at {instant} with {} planets",
            snapshot.planets.len()
        );
        Ok(snapshot)
    }
}
