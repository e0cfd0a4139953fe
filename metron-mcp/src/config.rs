//! Server configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use metron_core::DISPLAY_PRECISION;
use metron_rates::{DEFAULT_RETRIES, DEFAULT_TTL};
use tracing::warn;

pub const RATES_PATH_VAR: &str = "METRON_RATES_PATH";
pub const PRECISION_VAR: &str = "METRON_PRECISION";
pub const RATE_TTL_VAR: &str = "METRON_RATE_TTL_SECS";
pub const RATE_RETRIES_VAR: &str = "METRON_RATE_RETRIES";

/// f64 carries roughly 15 significant decimal digits
pub const MAX_PRECISION: u32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// JSON rate file; `None` uses the built-in table
    pub rates_path: Option<PathBuf>,
    /// Decimal places in tool output
    pub precision: u32,
    pub rate_ttl: Duration,
    pub rate_retries: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rates_path: None,
            precision: DISPLAY_PRECISION,
            rate_ttl: DEFAULT_TTL,
            rate_retries: DEFAULT_RETRIES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Invalid values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let rates_path = lookup(RATES_PATH_VAR)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let precision = parse_var(&lookup, PRECISION_VAR, defaults.precision)
            .min(MAX_PRECISION);
        let rate_ttl = Duration::from_secs(
            parse_var(&lookup, RATE_TTL_VAR, defaults.rate_ttl.as_secs()),
        );
        let rate_retries = parse_var(&lookup, RATE_RETRIES_VAR, defaults.rate_retries);

        Self { rates_path, precision, rate_ttl, rate_retries }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(var = key, value = %raw, default = %default, "invalid value, using default");
                default
            }
        },
    }
}
