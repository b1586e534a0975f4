mod file;
mod http;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use oracle_config::{load_oracle_settings, resolve_api_key, OracleSettings};
use vedic_core::vedic::dasha::{current_dasha, vimshottari_timeline, DashaLevel};
use vedic_core::vedic::moon_phase::{synodic_phase, MoonPhase};
use vedic_core::{BirthData, EphemerisProvider, Oracle};

use crate::file::FileEphemeris;
use crate::http::HttpEphemeris;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vedic chart oracle")]
struct Args {
    /// Explicit oracle.toml (otherwise configs/oracle.toml is searched).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble the full horoscope for a birth instant and place.
    Chart {
        /// Birth instant: RFC 3339 or `YYYY-MM-DD[ HH:MM[:SS]]` (UTC).
        #[arg(long)]
        birth: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Evaluation instant (default: now).
        #[arg(long)]
        at: Option<String>,
        /// Saved natal snapshot; use with --transit-file to skip the API.
        #[arg(long, requires = "transit_file")]
        natal_file: Option<PathBuf>,
        #[arg(long, requires = "natal_file")]
        transit_file: Option<PathBuf>,
        /// Print the plain-text digest instead of JSON.
        #[arg(long)]
        summary: bool,
    },
    /// Vimshottari dasha for a natal Moon longitude.
    Dasha {
        /// Sidereal Moon longitude in degrees.
        #[arg(long)]
        moon: f64,
        #[arg(long)]
        birth: String,
        #[arg(long)]
        at: Option<String>,
        /// Print the full timeline as JSON instead of the running label.
        #[arg(long)]
        timeline: bool,
        /// Timeline depth: mahadasha, antardasha or pratyantardasha.
        #[arg(long)]
        depth: Option<String>,
    },
    /// Moon phase from a tithi, or from the synodic month at an instant.
    Phase {
        #[arg(long, conflicts_with = "at")]
        tithi: Option<u8>,
        #[arg(long)]
        at: Option<String>,
    },
}

fn parse_instant(text: &str, what: &str) -> anyhow::Result<DateTime<Utc>> {
    BirthData::parse_instant(text).with_context(|| format!("invalid {what} instant: {text:?}"))
}

fn parse_at(at: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match at {
        Some(text) => parse_instant(text, "evaluation"),
        None => Ok(Utc::now()),
    }
}

async fn print_chart<P: EphemerisProvider>(
    oracle: Oracle<P>,
    birth: &BirthData,
    at: DateTime<Utc>,
    summary: bool,
) -> anyhow::Result<()> {
    let result = oracle.horoscope_at(birth, at).await;
    if summary {
        print!("{}", result.summary());
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_chart(
    settings: OracleSettings,
    birth: &str,
    lat: f64,
    lon: f64,
    at: Option<&str>,
    natal_file: Option<PathBuf>,
    transit_file: Option<PathBuf>,
    summary: bool,
) -> anyhow::Result<()> {
    let birth = BirthData {
        instant: parse_instant(birth, "birth")?,
        latitude: lat,
        longitude: lon,
    };
    let at = parse_at(at)?;
    let OracleSettings { provider, assembly } = settings;

    match (natal_file, transit_file) {
        (Some(natal), Some(transit)) => {
            let source = FileEphemeris::new(natal, transit, birth.instant);
            print_chart(Oracle::new(source, assembly), &birth, at, summary).await
        }
        _ => {
            let key = resolve_api_key(&provider);
            if key.is_none() {
                log::warn!("{} is not set; calling the API without a key", provider.api_key_env);
            }
            let source = HttpEphemeris::new(&provider, key)?;
            print_chart(Oracle::new(source, assembly), &birth, at, summary).await
        }
    }
}

fn run_dasha(
    settings: &OracleSettings,
    moon: f64,
    birth: &str,
    at: Option<&str>,
    timeline: bool,
    depth: Option<&str>,
) -> anyhow::Result<()> {
    let birth = parse_instant(birth, "birth")?;
    if timeline {
        let depth = match depth {
            Some(d) => d.parse::<DashaLevel>()?,
            None => settings.assembly.dasha_depth,
        };
        let periods = vimshottari_timeline(moon, birth, depth)?;
        println!("{}", serde_json::to_string_pretty(&periods)?);
    } else {
        let state = current_dasha(moon, birth, parse_at(at)?)?;
        println!("{state}");
        println!(
            "  mahadasha   {} {} -> {}",
            state.mahadasha.lord, state.mahadasha.start, state.mahadasha.end
        );
        println!(
            "  antardasha  {} {} -> {}",
            state.antardasha.lord, state.antardasha.start, state.antardasha.end
        );
    }
    Ok(())
}

fn run_phase(tithi: Option<u8>, at: Option<&str>) -> anyhow::Result<()> {
    let phase = match tithi {
        Some(t) => MoonPhase::from_tithi(t)?,
        None => synodic_phase(parse_at(at)?),
    };
    println!("{phase}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = load_oracle_settings(args.config.as_deref())?;

    match args.command {
        Command::Chart {
            birth,
            lat,
            lon,
            at,
            natal_file,
            transit_file,
            summary,
        } => {
            run_chart(
                settings,
                &birth,
                lat,
                lon,
                at.as_deref(),
                natal_file,
                transit_file,
                summary,
            )
            .await
        }
        Command::Dasha {
            moon,
            birth,
            at,
            timeline,
            depth,
        } => run_dasha(&settings, moon, &birth, at.as_deref(), timeline, depth.as_deref()),
        Command::Phase { tithi, at } => run_phase(tithi, at.as_deref()),
    }
}
