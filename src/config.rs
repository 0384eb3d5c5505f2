//! Configuration module for Nudge.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `NUDGE_SERVER_URL` | Yes | - | Todo store base URL (e.g., `http://127.0.0.1:8000`) |
//! | `NUDGE_TOKEN` | No | - | Bearer token for the store (binary convenience) |
//! | `NUDGE_POLL_INTERVAL_SECS` | No | 60 | Seconds between reminder evaluations |
//! | `NUDGE_REQUEST_TIMEOUT_SECS` | No | 30 | HTTP request timeout |
//!
//! # Example
//!
//! ```no_run
//! use nudge::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Store URL: {}", config.server_url);
//! ```

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default interval between reminder evaluations, in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Default HTTP request timeout, in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for the Nudge client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote todo store.
    pub server_url: String,

    /// Optional bearer token. When absent the session starts unauthenticated.
    pub token: Option<String>,

    /// Interval between reminder evaluations.
    pub poll_interval: Duration,

    /// Timeout applied to every store request.
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `NUDGE_SERVER_URL` is not set
    /// - an interval variable is set but is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = env::var("NUDGE_SERVER_URL")
            .map_err(|_| ConfigError::MissingEnvVar("NUDGE_SERVER_URL".to_string()))?;

        let token = env::var("NUDGE_TOKEN").ok().filter(|t| !t.is_empty());

        let poll_interval = Duration::from_secs(parse_secs(
            "NUDGE_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let request_timeout = Duration::from_secs(parse_secs(
            "NUDGE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        Ok(Self {
            server_url,
            token,
            poll_interval,
            request_timeout,
        })
    }
}

/// Parses an optional seconds variable that must be at least 1 when set.
fn parse_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(val) => {
            let secs = val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected positive integer, got '{val}'"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least 1 second".to_string(),
                });
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to run tests with isolated environment variables.
    /// Clears all NUDGE_* vars before the test and restores them after.
    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let saved_vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with("NUDGE_"))
            .collect();

        for (key, _) in &saved_vars {
            env::remove_var(key);
        }

        let result = f();

        for (key, value) in saved_vars {
            env::set_var(key, value);
        }

        result
    }

    #[test]
    #[serial]
    fn test_missing_server_url() {
        with_clean_env(|| {
            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(ref s) if s == "NUDGE_SERVER_URL"));
        });
    }

    #[test]
    #[serial]
    fn test_minimal_config() {
        with_clean_env(|| {
            env::set_var("NUDGE_SERVER_URL", "http://127.0.0.1:8000");

            let config = Config::from_env().expect("should parse minimal config");

            assert_eq!(config.server_url, "http://127.0.0.1:8000");
            assert!(config.token.is_none());
            assert_eq!(
                config.poll_interval,
                Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
            );
            assert_eq!(
                config.request_timeout,
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
            );
        });
    }

    #[test]
    #[serial]
    fn test_full_config() {
        with_clean_env(|| {
            env::set_var("NUDGE_SERVER_URL", "https://todos.example.com");
            env::set_var("NUDGE_TOKEN", "s3cret");
            env::set_var("NUDGE_POLL_INTERVAL_SECS", "15");
            env::set_var("NUDGE_REQUEST_TIMEOUT_SECS", "5");

            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.server_url, "https://todos.example.com");
            assert_eq!(config.token.as_deref(), Some("s3cret"));
            assert_eq!(config.poll_interval, Duration::from_secs(15));
            assert_eq!(config.request_timeout, Duration::from_secs(5));
        });
    }

    #[test]
    #[serial]
    fn test_empty_token_treated_as_absent() {
        with_clean_env(|| {
            env::set_var("NUDGE_SERVER_URL", "http://127.0.0.1:8000");
            env::set_var("NUDGE_TOKEN", "");

            let config = Config::from_env().expect("should parse config");
            assert!(config.token.is_none());
        });
    }

    #[test]
    #[serial]
    fn test_invalid_poll_interval() {
        with_clean_env(|| {
            env::set_var("NUDGE_SERVER_URL", "http://127.0.0.1:8000");
            env::set_var("NUDGE_POLL_INTERVAL_SECS", "soon");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, .. } if key == "NUDGE_POLL_INTERVAL_SECS"
            ));
        });
    }

    #[test]
    #[serial]
    fn test_zero_poll_interval_rejected() {
        with_clean_env(|| {
            env::set_var("NUDGE_SERVER_URL", "http://127.0.0.1:8000");
            env::set_var("NUDGE_POLL_INTERVAL_SECS", "0");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, ref message }
                    if key == "NUDGE_POLL_INTERVAL_SECS" && message.contains("at least 1")
            ));
        });
    }

    #[test]
    #[serial]
    fn test_zero_request_timeout_rejected() {
        with_clean_env(|| {
            env::set_var("NUDGE_SERVER_URL", "http://127.0.0.1:8000");
            env::set_var("NUDGE_REQUEST_TIMEOUT_SECS", "0");

            let result = Config::from_env();
            assert!(result.is_err());
        });
    }
}
