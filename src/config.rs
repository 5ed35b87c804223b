//! Daemon configuration.
//!
//! Each setting resolves as: command-line flag, then environment variable,
//! then built-in default.

use std::env;

use crate::engine::registry::DEFAULT_MAX_VALUE_LENGTH;
use crate::{Error, Result};

pub const ENV_BIND: &str = "STRING_ANALYZER_BIND";
pub const ENV_PORT: &str = "STRING_ANALYZER_PORT";
pub const ENV_MAX_LENGTH: &str = "STRING_ANALYZER_MAX_LENGTH";
pub const ENV_SEED: &str = "STRING_ANALYZER_SEED";

/// Settings for `string-analyzerd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Longest accepted `value`, in characters.
    pub max_value_length: usize,
    /// Insert the sample strings at startup.
    pub seed_samples: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
            seed_samples: false,
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub max_value_length: Option<usize>,
    pub seed_samples: bool,
}

impl ServerConfig {
    /// Resolves against the process environment.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    /// Resolves against an arbitrary variable lookup.
    pub fn resolve_with<F>(overrides: Overrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let bind = overrides
            .bind
            .or_else(|| var(ENV_BIND))
            .unwrap_or(defaults.bind);

        let port = match overrides.port {
            Some(p) => p,
            None => var(ENV_PORT)
                .map(|raw| parse_env(ENV_PORT, &raw))
                .transpose()?
                .unwrap_or(defaults.port),
        };

        let max_value_length = match overrides.max_value_length {
            Some(n) => n,
            None => var(ENV_MAX_LENGTH)
                .map(|raw| parse_env(ENV_MAX_LENGTH, &raw))
                .transpose()?
                .unwrap_or(defaults.max_value_length),
        };

        let seed_samples = overrides.seed_samples
            || match var(ENV_SEED) {
                Some(raw) => parse_flag(&raw)?,
                None => defaults.seed_samples,
            };

        Ok(Self { bind, port, max_value_length, seed_samples })
    }

    /// `bind:port`, ready for a listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{} has an invalid value: {:?}", key, raw)))
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(Error::InvalidInput(format!("{} has an invalid value: {:?}", ENV_SEED, raw))),
    }
}
