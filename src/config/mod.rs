//! Configuration management

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed Robot webservice endpoint
pub const DEFAULT_BASE_URL: &str = "https://robot-ws.your-server.de";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_PREFIX: &str = "HROBOTCLI_";

/// Invalid or incomplete environment configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: &'static str,
    },
}

/// Main configuration structure, immutable once loaded
#[derive(Clone)]
pub struct Config {
    /// Robot webservice user
    pub user: String,

    /// Robot webservice password
    pub password: String,

    /// API base URL without trailing slash
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Output format
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            let value = lookup(&name).filter(|v| !v.trim().is_empty());
            (name, value)
        };

        let required = |suffix: &str| match var(suffix) {
            (_, Some(value)) => Ok(value),
            (name, None) => Err(ConfigError::Missing(name)),
        };

        let user = required("USER")?;
        let password = required("PASSWORD")?;

        let base_url = var("BASE_URL")
            .1
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = match var("TIMEOUT") {
            (_, None) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            (name, Some(value)) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: name,
                        value,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
        };

        let output_format = match var("OUTPUT_FORMAT") {
            (_, None) => OutputFormat::default(),
            (name, Some(value)) => OutputFormat::parse(&value).ok_or(ConfigError::Invalid {
                var: name,
                value,
                reason: "expected table, json or compact",
            })?,
        };

        Ok(Self {
            user,
            password,
            base_url,
            timeout,
            output_format,
        })
    }

    /// Same configuration with a different output format
    pub fn with_output_format(self, output_format: OutputFormat) -> Self {
        Self {
            output_format,
            ..self
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field("password", &"********")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("output_format", &self.output_format)
            .finish()
    }
}
