//! Two-choice confirmation prompts

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Label of the confirming choice
pub const CONFIRM_LABEL: &str = "Confirm";

/// Label of the cancelling choice
pub const CANCEL_LABEL: &str = "Cancel";

/// Question put to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmRequest {
    /// Short question
    pub title: String,
    /// Explanation shown under the title
    pub message: String,
}

impl ConfirmRequest {
    /// Question asked before deleting the todo with `text`
    #[must_use]
    pub fn delete(text: &str) -> Self {
        Self {
            title: format!("Delete {text}?"),
            message: "Please Confirm to Proceed".to_string(),
        }
    }
}

/// Answer to a [`ConfirmRequest`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Go ahead
    Confirm,
    /// Do nothing
    Cancel,
}

impl Choice {
    /// Label shown for this choice
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirm => CONFIRM_LABEL,
            Self::Cancel => CANCEL_LABEL,
        }
    }
}

/// Asks the user to confirm or cancel
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Put `request` to the user and wait for the answer
    async fn ask(&self, request: ConfirmRequest) -> Choice;
}

/// Prompt that always gives the same answer and remembers what it was asked
#[derive(Clone, Debug)]
pub struct StaticPrompt {
    choice: Choice,
    asked: Arc<Mutex<Vec<ConfirmRequest>>>,
}

impl StaticPrompt {
    /// Always confirm
    #[must_use]
    pub fn confirming() -> Self {
        Self::answering(Choice::Confirm)
    }

    /// Always cancel
    #[must_use]
    pub fn cancelling() -> Self {
        Self::answering(Choice::Cancel)
    }

    /// Always answer `choice`
    #[must_use]
    pub fn answering(choice: Choice) -> Self {
        Self {
            choice,
            asked: Arc::default(),
        }
    }

    /// Every request received so far
    #[must_use]
    pub fn asked(&self) -> Vec<ConfirmRequest> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ConfirmPrompt for StaticPrompt {
    async fn ask(&self, request: ConfirmRequest) -> Choice {
        tracing::debug!(title = %request.title, choice = self.choice.label(), "Answering prompt");
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.choice
    }
}
