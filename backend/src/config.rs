//! Runtime settings read from the environment (and `.env`, if present).
//!
//! | Variable                | Default |
//! |-------------------------|---------|
//! | `SWEEPER_PORT`          | `3000`  |
//! | `SWEEPER_MAX_UPLOAD_MB` | `200`   |
//! | `SWEEPER_LOG`           | `info`  |

use std::str::FromStr;

use crate::error::ConfigError;

pub const PORT_VAR: &str = "SWEEPER_PORT";
pub const MAX_UPLOAD_VAR: &str = "SWEEPER_MAX_UPLOAD_MB";
pub const LOG_VAR: &str = "SWEEPER_LOG";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_MB: usize = 200;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
    /// `tracing-subscriber` filter directive
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var(&lookup, PORT_VAR)?.unwrap_or(defaults.port);

        let max_upload_mb: usize =
            parse_var(&lookup, MAX_UPLOAD_VAR)?.unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        if max_upload_mb == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_UPLOAD_VAR,
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let log_filter = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            port,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            log_filter,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                message: e.to_string(),
            }),
    }
}
