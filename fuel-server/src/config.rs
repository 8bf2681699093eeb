//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::pipeline::UnresolvedPolicy;

/// Default bind address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Default price model file.
const DEFAULT_GAS_MODELS_PATH: &str = "gas_models.json";

/// Mapbox's default geocoding allowance.
const DEFAULT_GEOCODE_CALLS_PER_MINUTE: u32 = 600;

/// Vehicle efficiency used when a request gives none (miles per gallon).
pub const DEFAULT_MPG: f64 = 27.0;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Mapbox access token (`MAPBOX_TOKEN`).
    pub mapbox_token: String,

    /// Price model file (`GAS_MODELS_PATH`).
    pub gas_models_path: PathBuf,

    /// Listen address (`BIND_ADDR`).
    pub bind_addr: SocketAddr,

    /// Geocoding calls allowed per minute (`GEOCODE_MAX_CALLS_PER_MINUTE`).
    pub geocode_calls_per_minute: u32,

    /// Steps resolved concurrently per trip (`RESOLVE_CONCURRENCY`).
    pub resolve_concurrency: usize,

    /// Per-request time limit (`REQUEST_TIMEOUT_SECS`).
    pub request_timeout: Duration,

    /// Handling of unresolved distance (`UNRESOLVED_POLICY`: `exclude` or `fail`).
    pub unresolved_policy: UnresolvedPolicy,

    /// Efficiency assumed when a request omits it.
    pub default_mpg: f64,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let mapbox_token = get("MAPBOX_TOKEN").ok_or(ConfigError::Missing("MAPBOX_TOKEN"))?;

        let unresolved_policy = match get("UNRESOLVED_POLICY").as_deref().map(str::trim) {
            None | Some("exclude") => UnresolvedPolicy::Exclude,
            Some("fail") => UnresolvedPolicy::Fail,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "UNRESOLVED_POLICY",
                    value: other.to_string(),
                });
            }
        };

        let geocode_calls_per_minute = parse_or(
            "GEOCODE_MAX_CALLS_PER_MINUTE",
            get("GEOCODE_MAX_CALLS_PER_MINUTE"),
            DEFAULT_GEOCODE_CALLS_PER_MINUTE,
        )?;
        let resolve_concurrency: usize =
            parse_or("RESOLVE_CONCURRENCY", get("RESOLVE_CONCURRENCY"), 4)?;
        let timeout_secs: u64 = parse_or("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 60)?;

        let raw_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = raw_addr.trim().parse().map_err(|_| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        if geocode_calls_per_minute == 0 {
            return Err(ConfigError::Invalid {
                var: "GEOCODE_MAX_CALLS_PER_MINUTE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            mapbox_token,
            gas_models_path: get("GAS_MODELS_PATH")
                .unwrap_or_else(|| DEFAULT_GAS_MODELS_PATH.to_string())
                .into(),
            bind_addr,
            geocode_calls_per_minute,
            resolve_concurrency: resolve_concurrency.max(1),
            request_timeout: Duration::from_secs(timeout_secs),
            unresolved_policy,
            default_mpg: DEFAULT_MPG,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { var, value: v }),
    }
}
