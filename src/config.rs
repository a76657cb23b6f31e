//! Service configuration loaded from the environment (and `.env`)

use std::env;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://orders.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_NOTIFICATION_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got {value}")]
    InvalidCapacity { var: &'static str, value: String },
    #[error("{var} must be 'pretty' or 'json', got {value}")]
    InvalidLogFormat { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub notification_queue_capacity: usize,
    pub log_format: LogFormat,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidAddr {
            var: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let notification_queue_capacity = match lookup("NOTIFICATION_QUEUE_CAPACITY") {
            None => DEFAULT_NOTIFICATION_QUEUE_CAPACITY,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidCapacity {
                        var: "NOTIFICATION_QUEUE_CAPACITY",
                        value: raw,
                    })
                }
            },
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidLogFormat {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            bind_addr,
            notification_queue_capacity,
            log_format,
        })
    }
}
