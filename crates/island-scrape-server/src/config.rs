//! Configuration loading and resolution.
//!
//! Precedence is CLI flag, then environment variable, then default.

use island_scrape::{HttpFetcherConfig, Pacing};
use std::net::SocketAddr;
use std::time::Duration;

pub const ENV_ADDR: &str = "ISLAND_SCRAPE_ADDR";
pub const ENV_MIN_DELAY_MS: &str = "ISLAND_SCRAPE_MIN_DELAY_MS";
pub const ENV_MAX_DELAY_MS: &str = "ISLAND_SCRAPE_MAX_DELAY_MS";
pub const ENV_TIMEOUT_MS: &str = "ISLAND_SCRAPE_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "ISLAND_SCRAPE_USER_AGENT";

const DEFAULT_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_MIN_DELAY_MS: u64 = 2_000;
const DEFAULT_MAX_DELAY_MS: u64 = 5_000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Minimum delay {min_ms}ms exceeds maximum delay {max_ms}ms")]
    InvertedDelay { min_ms: u64, max_ms: u64 },
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub min_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub no_delay: bool,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub pacing: Pacing,
    pub fetcher: HttpFetcherConfig,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let addr_raw = overrides
            .addr
            .or_else(|| env(ENV_ADDR))
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: ENV_ADDR,
                value: addr_raw.clone(),
            })?;

        let min_ms = pick_u64(overrides.min_delay_ms, &env, ENV_MIN_DELAY_MS, DEFAULT_MIN_DELAY_MS)?;
        let max_ms = pick_u64(overrides.max_delay_ms, &env, ENV_MAX_DELAY_MS, DEFAULT_MAX_DELAY_MS)?;
        let timeout_ms = pick_u64(overrides.timeout_ms, &env, ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?;

        let pacing = if overrides.no_delay {
            Pacing::disabled()
        } else {
            Pacing::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
                .ok_or(ConfigError::InvertedDelay { min_ms, max_ms })?
        };

        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: ENV_TIMEOUT_MS,
                value: "0".to_string(),
            });
        }

        let user_agent = overrides
            .user_agent
            .or_else(|| env(ENV_USER_AGENT))
            .filter(|ua| !ua.trim().is_empty());

        Ok(Self {
            addr,
            pacing,
            fetcher: HttpFetcherConfig {
                timeout: Duration::from_millis(timeout_ms),
                user_agent,
            },
        })
    }
}

fn pick_u64(
    explicit: Option<u64>,
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    if let Some(v) = explicit {
        return Ok(v);
    }
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}
