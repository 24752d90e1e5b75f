//! Configuration for the todo client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The remote service part is delegated to [`ApiConfig`].

use crate::filter::Filter;
use composable_todo_api::{ApiConfig, ConfigError, UserId};
use std::fmt;
use std::str::FromStr;

/// What a failed toggle does to the optimistic value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Restore the value from before the toggle
    #[default]
    Revert,
    /// Legacy reconciliation: keep the flipped value on failure, and leave
    /// `loading` set after a successful toggle unless the filter is `All`
    KeepOptimistic,
}

impl FailurePolicy {
    /// Name used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revert => "revert",
            Self::KeepOptimistic => "keep-optimistic",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revert" => Ok(Self::Revert),
            "keep-optimistic" | "keep_optimistic" => Ok(Self::KeepOptimistic),
            _ => Err(ConfigError::Invalid {
                key: "TODO_FAILURE_POLICY".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote service settings
    pub api: ApiConfig,
    /// User to act as when none is given on the command line (`TODO_USER_ID`)
    pub user_id: Option<UserId>,
    /// Toggle failure handling (`TODO_FAILURE_POLICY`)
    pub failure_policy: FailurePolicy,
    /// Filter the list starts with (`TODO_DEFAULT_FILTER`)
    pub default_filter: Filter,
}

impl AppConfig {
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
        let api = ApiConfig::from_lookup(&lookup)?;

        let user_id = lookup("TODO_USER_ID")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(UserId::new);

        let failure_policy = lookup("TODO_FAILURE_POLICY")
            .map(|raw| raw.parse::<FailurePolicy>())
            .transpose()?
            .unwrap_or_default();

        let default_filter = match lookup("TODO_DEFAULT_FILTER") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "TODO_DEFAULT_FILTER".to_string(),
                value: raw.clone(),
            })?,
            None => Filter::default(),
        };

        Ok(Self {
            api,
            user_id,
            failure_policy,
            default_filter,
        })
    }
}
