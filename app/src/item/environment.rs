//! Dependencies of the item reducer

use crate::auth::AuthContext;
use crate::config::FailurePolicy;
use crate::list::TodoList;
use crate::prompt::ConfirmPrompt;
use composable_todo_api::TodoService;
use std::sync::Arc;

/// Handles injected into every item
#[derive(Clone)]
pub struct TodoItemEnvironment {
    /// Remote service
    pub service: Arc<dyn TodoService>,
    /// Shared collection the item reconciles into
    pub list: TodoList,
    /// Signed-in user; mutations require one
    pub auth: AuthContext,
    /// Asks before deleting
    pub prompt: Arc<dyn ConfirmPrompt>,
    /// What a failed toggle does to the optimistic value
    pub failure_policy: FailurePolicy,
}

impl TodoItemEnvironment {
    /// Creates an environment with the default failure policy
    #[must_use]
    pub fn new(
        service: Arc<dyn TodoService>,
        list: TodoList,
        auth: AuthContext,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            service,
            list,
            auth,
            prompt,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Use `failure_policy` for failed toggles
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
