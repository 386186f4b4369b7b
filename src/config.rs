//! Runtime settings, read from `CAR_MARKET_*` environment variables.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_FX_URL: &str = "https://api.exchangerate.host/latest";
pub const DEFAULT_FX_TIMEOUT: Duration = Duration::from_secs(5);
/// Shared TTL for the exchange-rate cache before a refresh is triggered.
pub const DEFAULT_FX_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_FX_FALLBACK: f64 = 0.92;

const ENV_FX_URL: &str = "CAR_MARKET_FX_URL";
const ENV_FX_TIMEOUT: &str = "CAR_MARKET_FX_TIMEOUT_SECS";
const ENV_FX_TTL: &str = "CAR_MARKET_FX_TTL_SECS";
const ENV_FX_FALLBACK: &str = "CAR_MARKET_FX_FALLBACK";
const ENV_EXPORT_DIR: &str = "CAR_MARKET_EXPORT_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },
    #[error("{key}: expected {expected}, got {value:?}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub fx_url: String,
    pub fx_timeout: Duration,
    pub fx_ttl: Duration,
    pub fx_fallback: f64,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fx_url: DEFAULT_FX_URL.to_string(),
            fx_timeout: DEFAULT_FX_TIMEOUT,
            fx_ttl: DEFAULT_FX_TTL,
            fx_fallback: DEFAULT_FX_FALLBACK,
            export_dir: default_export_dir(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_FX_URL) {
            let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
                key: ENV_FX_URL,
                source,
            })?;
            config.fx_url = url.into();
        }
        if let Some(raw) = lookup(ENV_FX_TIMEOUT) {
            config.fx_timeout = Duration::from_secs(parse_secs(ENV_FX_TIMEOUT, &raw)?);
        }
        if let Some(raw) = lookup(ENV_FX_TTL) {
            config.fx_ttl = Duration::from_secs(parse_secs(ENV_FX_TTL, &raw)?);
        }
        if let Some(raw) = lookup(ENV_FX_FALLBACK) {
            config.fx_fallback = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|rate| rate.is_finite() && *rate > 0.0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_FX_FALLBACK,
                    expected: "a positive rate",
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup(ENV_EXPORT_DIR) {
            if !raw.trim().is_empty() {
                config.export_dir = PathBuf::from(raw.trim());
            }
        }

        Ok(config)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            expected: "whole seconds",
            value: raw.to_string(),
        })
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_keys_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.fx_url, DEFAULT_FX_URL);
        assert_eq!(config.fx_timeout, DEFAULT_FX_TIMEOUT);
        assert_eq!(config.fx_ttl, DEFAULT_FX_TTL);
        assert_eq!(config.fx_fallback, DEFAULT_FX_FALLBACK);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_FX_URL, "http://localhost:9000/latest"),
            (ENV_FX_TIMEOUT, "2"),
            (ENV_FX_TTL, " 60 "),
            (ENV_FX_FALLBACK, "0.95"),
            (ENV_EXPORT_DIR, "/tmp/exports"),
        ]))
        .unwrap();
        assert_eq!(config.fx_url, "http://localhost:9000/latest");
        assert_eq!(config.fx_timeout, Duration::from_secs(2));
        assert_eq!(config.fx_ttl, Duration::from_secs(60));
        assert_eq!(config.fx_fallback, 0.95);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_FX_URL, "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_FX_TTL, "1h")])),
            Err(ConfigError::InvalidValue { key: ENV_FX_TTL, .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_FX_FALLBACK, "-1")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
