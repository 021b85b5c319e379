//! Process configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::cache::CacheConfig;
use crate::provider::AmadeusConfig;
use crate::results::PipelineConfig;

const DEFAULT_AIRPORTS_PATH: &str = "data/airports_iata.json";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
#[error("invalid {key} value {value:?}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub message: String,
}

/// Where flights come from.
#[derive(Debug, Clone)]
pub enum ProviderSettings {
    /// Live Amadeus API
    Amadeus(AmadeusConfig),

    /// Fixed flights loaded from a JSON file
    Static(PathBuf),
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderSettings,
    pub airports_path: PathBuf,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub pipeline: PipelineConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("FLIGHTS_MOCK_DATA") {
            Some(path) => {
                info!(%path, "using static flight data");
                ProviderSettings::Static(PathBuf::from(path))
            }
            None => {
                let client_id = var("FLIGHTS_API_CLIENT_ID").unwrap_or_else(|| {
                    warn!("FLIGHTS_API_CLIENT_ID not set, flight searches will fail");
                    String::new()
                });
                let client_secret = var("FLIGHTS_API_CLIENT_SECRET").unwrap_or_else(|| {
                    warn!("FLIGHTS_API_CLIENT_SECRET not set, flight searches will fail");
                    String::new()
                });

                let mut amadeus = AmadeusConfig::new(client_id, client_secret);
                if let Some(url) = var("FLIGHTS_API_URL") {
                    amadeus = amadeus.with_base_url(url.trim_end_matches('/'));
                }
                if let Some(url) = var("FLIGHTS_API_TOKEN_URL") {
                    amadeus = amadeus.with_token_url(url);
                }
                ProviderSettings::Amadeus(amadeus)
            }
        };

        Ok(Self {
            provider,
            airports_path: var("AIRPORTS_PATH")
                .unwrap_or_else(|| DEFAULT_AIRPORTS_PATH.to_string())
                .into(),
            data_dir: var("DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            bind_addr: parse_or("BIND_ADDR", var("BIND_ADDR"), DEFAULT_BIND_ADDR)?,
            pipeline: PipelineConfig::default(),
            cache: CacheConfig::default(),
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        message: e.to_string(),
        value,
    })
}
