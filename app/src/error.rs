//! Error types for the todo client

use composable_todo_runtime::StoreError;
use thiserror::Error;

/// Input rejected before any request is issued
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Text was empty after trimming
    #[error("Required")]
    Required,

    /// An edit was submitted while the item was not in edit mode
    #[error("Not in edit mode")]
    NotEditing,
}

/// Errors returned by item controllers and the list screen
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// Input failed validation; no request was issued
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The underlying store rejected the action
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by the auth context
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No user is signed in
    #[error("Not signed in")]
    NotSignedIn,

    /// The authenticator rejected the credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No authenticator is configured
    #[error("Sign-in is not available")]
    Unavailable,

    /// Another sign-in is still running
    #[error("Sign-in already in progress")]
    InProgress,
}
