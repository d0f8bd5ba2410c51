//! Client configuration.
//!
//! Configuration is read once, then handed to the client by value. No
//! global client exists; every `OperadorasApi` owns its settings.

use std::time::Duration;

use thiserror::Error;

pub const BASE_URL_VAR: &str = "OPERADORAS_API_URL";
pub const TIMEOUT_VAR: &str = "OPERADORAS_API_TIMEOUT_MS";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Settings shared by every request of one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL. Empty means same-origin.
    pub base_url: String,
    /// Upper bound on a whole request round trip.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the process environment, reading a `.env` file first if
    /// one exists.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` when the timeout is not a
    /// positive integer number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_default();
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self { base_url, timeout })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        key: TIMEOUT_VAR.to_string(),
        message: message.to_string(),
    };
    let millis: u64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("expected milliseconds as an integer"))?;
    if millis == 0 {
        return Err(invalid("timeout must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}
