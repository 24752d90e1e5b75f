//! Configuration for the remote todo service client.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public mock API the client talks to by default
pub const DEFAULT_BASE_URL: &str = "https://5e65ab532aea440016afb25f.mockapi.io";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Remote service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the service (`TODO_API_BASE_URL`)
    pub base_url: String,
    /// Request timeout in seconds (`TODO_API_TIMEOUT_SECS`)
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("TODO_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match lookup("TODO_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "TODO_API_TIMEOUT_SECS".to_string(),
                value: raw.clone(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            base_url,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty or the timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    /// Request timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
