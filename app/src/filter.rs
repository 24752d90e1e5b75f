//! List filters

use composable_todo_api::Todo;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet complete
    Active,
    /// Completed todos
    Completed,
}

impl Filter {
    /// Returns `true` if `todo` is shown under this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.complete,
            Self::Completed => todo.complete,
        }
    }

    /// Lowercase name used on the command line and in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown filter '{0}' (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_match_by_completion() {
        let open = Todo::new("1", "u1", "Buy milk", false);
        let done = Todo::new("2", "u1", "Walk dog", true);

        assert!(Filter::All.matches(&open) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&open) && !Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&open) && Filter::Completed.matches(&done));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Completed".parse::<Filter>(), Ok(Filter::Completed));
        assert_eq!(" active ".parse::<Filter>(), Ok(Filter::Active));
        assert!("done".parse::<Filter>().is_err());
    }
}
