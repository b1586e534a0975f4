use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use vedic_core::vedic::dasha::DashaLevel;
use vedic_core::{AssemblyOptions, Body};

const DEFAULT_BASE_URL: &str = "https://json.astrologyapi.com/v1";
const DEFAULT_API_KEY_ENV: &str = "ASTRO_API_KEY";
const CONFIG_PATHS: [&str; 2] = ["configs/oracle.toml", "../../configs/oracle.toml"];

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout: Duration,
    pub ayanamsa: String,
}

#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub provider: ProviderSettings,
    pub assembly: AssemblyOptions,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                timeout: Duration::from_secs(default_timeout_secs()),
                ayanamsa: default_ayanamsa(),
            },
            assembly: AssemblyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ProviderToml {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    api_key_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_ayanamsa")]
    ayanamsa: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EngineToml {
    #[serde(default)]
    dasha_depth: Option<String>,
    #[serde(default)]
    transit_watch: Option<Vec<String>>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ayanamsa() -> String {
    "lahiri".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    provider: Option<ProviderToml>,
    #[serde(default)]
    engine: Option<EngineToml>,
}

/// Try the usual relative locations for `configs/oracle.toml`.
pub fn read_oracle_toml_text() -> anyhow::Result<String> {
    for p in &CONFIG_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load oracle.toml from {:?}", CONFIG_PATHS);
}

/// Parse and validate settings from TOML text.
pub fn parse_oracle_settings(text: &str) -> anyhow::Result<OracleSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse oracle.toml: {e}"))?;
    let mut settings = OracleSettings::default();

    if let Some(provider) = root.provider {
        let ProviderToml {
            base_url,
            api_key_env,
            timeout_secs,
            ayanamsa,
        } = provider;
        if let Some(url) = base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("provider.base_url must be an http(s) URL: {url}");
            }
            settings.provider.base_url = url;
        }
        if let Some(env) = api_key_env {
            if env.trim().is_empty() {
                anyhow::bail!("provider.api_key_env must not be empty");
            }
            settings.provider.api_key_env = env;
        }
        if timeout_secs == 0 {
            anyhow::bail!("provider.timeout_secs must be positive");
        }
        settings.provider.timeout = Duration::from_secs(timeout_secs);
        settings.provider.ayanamsa = ayanamsa.to_lowercase();
    }

    if let Some(engine) = root.engine {
        if let Some(depth) = engine.dasha_depth {
            settings.assembly.dasha_depth = depth
                .parse::<DashaLevel>()
                .map_err(|e| anyhow::anyhow!("engine.dasha_depth: {e}"))?;
        }
        if let Some(watch) = engine.transit_watch {
            settings.assembly.transit_watch = watch
                .iter()
                .map(|code| code.parse::<Body>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow::anyhow!("engine.transit_watch: {e}"))?;
        }
    }
    Ok(settings)
}

/// Load settings from `path`, or from the default locations. A missing
/// default file yields the built-in defaults; a missing explicit file is an
/// error.
pub fn load_oracle_settings(path: Option<&Path>) -> anyhow::Result<OracleSettings> {
    let text = match path {
        Some(p) => fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", p.display()))?,
        None => match read_oracle_toml_text() {
            Ok(text) => text,
            Err(e) => {
                log::info!("{e}; using built-in defaults");
                return Ok(OracleSettings::default());
            }
        },
    };
    parse_oracle_settings(&text)
}

/// Resolve the API key from the configured environment variable.
pub fn resolve_api_key(settings: &ProviderSettings) -> Option<String> {
    std::env::var(&settings.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_text_gives_defaults() {
        let settings = parse_oracle_settings("").unwrap();
        assert_eq!(settings.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.provider.timeout, Duration::from_secs(30));
        assert_eq!(settings.assembly.dasha_depth, DashaLevel::Antardasha);
        assert_eq!(settings.assembly.transit_watch.len(), 5);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            [provider]
            base_url = "http://localhost:8080/api"
            api_key_env = "MY_KEY"
            timeout_secs = 5
            ayanamsa = "Raman"

            [engine]
            dasha_depth = "pratyantardasha"
            transit_watch = ["Sa", "jupiter"]
        "#;
        let settings = parse_oracle_settings(text).unwrap();
        assert_eq!(settings.provider.base_url, "http://localhost:8080/api");
        assert_eq!(settings.provider.api_key_env, "MY_KEY");
        assert_eq!(settings.provider.timeout, Duration::from_secs(5));
        assert_eq!(settings.provider.ayanamsa, "raman");
        assert_eq!(settings.assembly.dasha_depth, DashaLevel::Pratyantardasha);
        assert_eq!(settings.assembly.transit_watch, vec![Body::Saturn, Body::Jupiter]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_oracle_settings("[provider]\nbase_url = \"ftp://x\"").is_err());
        assert!(parse_oracle_settings("[provider]\ntimeout_secs = 0").is_err());
        assert!(parse_oracle_settings("[engine]\ndasha_depth = \"yogini\"").is_err());
        assert!(parse_oracle_settings("[engine]\ntransit_watch = [\"Pluto\"]").is_err());
        assert!(parse_oracle_settings("not toml [").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[provider]\ntimeout_secs = 12").unwrap();
        let settings = load_oracle_settings(Some(file.path())).unwrap();
        assert_eq!(settings.provider.timeout, Duration::from_secs(12));

        let missing = Path::new("/nonexistent/oracle.toml");
        assert!(load_oracle_settings(Some(missing)).is_err());
    }
}
