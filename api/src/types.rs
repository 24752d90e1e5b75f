//! Wire types for the remote todo service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a todo, as assigned by the remote service
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Creates a `TodoId` from any string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of the user owning a todo
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId` from any string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A todo record as stored by the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Text of the todo
    pub text: String,
    /// Whether the todo is done
    pub complete: bool,
    /// Creation timestamp exactly as the service reported it
    #[serde(default)]
    pub created_at: String,
    /// Owner of the todo
    pub user_id: UserId,
}

impl Todo {
    /// Creates a todo record
    #[must_use]
    pub fn new(
        id: impl Into<TodoId>,
        user_id: impl Into<UserId>,
        text: impl Into<String>,
        complete: bool,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            complete,
            created_at: String::new(),
            user_id: user_id.into(),
        }
    }

    /// Parses `created_at` as an RFC 3339 timestamp
    ///
    /// Returns `None` when the service sent something else.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// Partial update sent with `PUT /users/{userId}/todos/{id}`
///
/// Serializes to exactly one field: `{"complete": bool}` or `{"text": string}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoPatch {
    /// Set the completion flag
    Complete {
        /// New completion flag
        complete: bool,
    },
    /// Replace the text
    Text {
        /// New text
        text: String,
    },
}

/// Body of `POST /users/{userId}/todos`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    /// Text of the new todo
    pub text: String,
    /// New todos start incomplete
    pub complete: bool,
}

impl NewTodo {
    /// A new, incomplete todo
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            complete: false,
        }
    }
}
