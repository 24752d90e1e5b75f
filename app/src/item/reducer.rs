//! Reducer for one todo item
//!
//! Intents change the shadow state before any request completes. Responses
//! are reconciled only if their request id is still awaited, and the shared
//! list is touched only through keyed updates.

use super::action::TodoItemAction;
use super::environment::TodoItemEnvironment;
use super::state::{ItemOperation, RequestId, TodoItemState};
use crate::config::FailurePolicy;
use crate::error::{AuthError, ValidationError};
use crate::filter::Filter;
use crate::prompt::{Choice, ConfirmRequest};
use composable_todo_api::{ApiError, Todo, TodoPatch};
use composable_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

type Effects = SmallVec<[Effect<TodoItemAction>; 4]>;

/// Reducer for [`TodoItemState`]
#[derive(Clone, Debug, Default)]
pub struct TodoItemReducer;

impl TodoItemReducer {
    /// Creates a new `TodoItemReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Reject intents on deleted items and when nobody is signed in
    fn guard(state: &mut TodoItemState, env: &TodoItemEnvironment) -> bool {
        if state.deleted {
            tracing::debug!(todo = %state.id, "Ignoring intent on deleted todo");
            return false;
        }
        if env.auth.user().is_none() {
            state.error = Some(AuthError::NotSignedIn.to_string());
            return false;
        }
        true
    }

    fn toggle_complete(state: &mut TodoItemState, env: &TodoItemEnvironment) -> Effects {
        if !Self::guard(state, env) {
            return SmallVec::new();
        }

        let previous = state.complete;
        state.rollback.get_or_insert(previous);
        state.complete = !previous;
        state.error = None;
        let request = state.begin(ItemOperation::Toggle);

        tracing::debug!(todo = %state.id, request, complete = state.complete, "Toggling todo");

        let service = env.service.clone();
        let user = state.user_id.clone();
        let id = state.id.clone();
        let patch = TodoPatch::Complete {
            complete: state.complete,
        };

        smallvec![
            Effect::future(async move {
                let result = service.update(&user, &id, &patch).await;
                Some(TodoItemAction::ToggleCompleted { request, result })
            })
            .cancellable(state.effect_id(ItemOperation::Toggle), true)
        ]
    }

    fn toggle_completed(
        state: &mut TodoItemState,
        request: RequestId,
        result: Result<Todo, ApiError>,
        env: &TodoItemEnvironment,
    ) -> Effects {
        if !state.finish(ItemOperation::Toggle, request) {
            tracing::debug!(todo = %state.id, request, "Discarding stale toggle response");
            return SmallVec::new();
        }
        let rollback = state.rollback.take();

        let failure = match result {
            Ok(todo) if todo.id == state.id => {
                let complete = todo.complete;
                env.list.replace_by_id(todo);
                if env.list.current_filter() == Filter::All {
                    state.complete = complete;
                } else if env.failure_policy == FailurePolicy::KeepOptimistic {
                    // Legacy reconciliation only settles the item under the All filter
                    state.loading = true;
                }
                state.error = None;
                return SmallVec::new();
            },
            Ok(todo) => {
                tracing::warn!(todo = %state.id, response = %todo.id, "Toggle answered for another todo");
                ApiError::NotFound
            },
            Err(error) => error,
        };

        tracing::warn!(todo = %state.id, error = %failure, policy = %env.failure_policy, "Toggle failed");
        state.error = Some(failure.to_string());
        if let (FailurePolicy::Revert, Some(previous)) = (env.failure_policy, rollback) {
            state.complete = previous;
        }
        SmallVec::new()
    }

    fn toggle_editing(state: &mut TodoItemState) -> Effects {
        if state.deleted {
            return SmallVec::new();
        }
        state.editing = !state.editing;
        state.loading = false;
        if !state.editing {
            state.field_error = None;
        }
        SmallVec::new()
    }

    fn submit_edit(state: &mut TodoItemState, text: String, env: &TodoItemEnvironment) -> Effects {
        if text.trim().is_empty() {
            state.field_error = Some(ValidationError::Required.to_string());
            return SmallVec::new();
        }
        if !state.editing {
            tracing::debug!(todo = %state.id, "Ignoring edit outside edit mode");
            return SmallVec::new();
        }
        if !Self::guard(state, env) {
            return SmallVec::new();
        }

        state.field_error = None;
        let request = state.begin(ItemOperation::Edit);

        tracing::debug!(todo = %state.id, request, "Submitting edit");

        let service = env.service.clone();
        let user = state.user_id.clone();
        let id = state.id.clone();
        let patch = TodoPatch::Text { text };

        smallvec![
            Effect::future(async move {
                let result = service.update(&user, &id, &patch).await;
                Some(TodoItemAction::EditSubmitted { request, result })
            })
            .cancellable(state.effect_id(ItemOperation::Edit), true)
        ]
    }

    fn edit_submitted(
        state: &mut TodoItemState,
        request: RequestId,
        result: Result<Todo, ApiError>,
        env: &TodoItemEnvironment,
    ) -> Effects {
        if !state.finish(ItemOperation::Edit, request) {
            tracing::debug!(todo = %state.id, request, "Discarding stale edit response");
            return SmallVec::new();
        }

        match result {
            Ok(todo) if todo.id == state.id => {
                state.text.clone_from(&todo.text);
                state.editing = false;
                state.field_error = None;
                env.list.replace_by_id(todo);
            },
            Ok(todo) => {
                tracing::warn!(todo = %state.id, response = %todo.id, "Edit answered for another todo");
                state.field_error = Some(ApiError::NotFound.to_string());
            },
            Err(error) => {
                tracing::warn!(todo = %state.id, error = %error, "Edit failed");
                state.field_error = Some(error.to_string());
            },
        }
        SmallVec::new()
    }

    fn delete_requested(state: &mut TodoItemState, env: &TodoItemEnvironment) -> Effects {
        if state.confirming_delete || state.in_flight.delete.is_some() {
            return SmallVec::new();
        }
        if !Self::guard(state, env) {
            return SmallVec::new();
        }

        state.confirming_delete = true;

        let prompt = env.prompt.clone();
        let request = ConfirmRequest::delete(&state.text);

        smallvec![
            Effect::future(async move {
                let choice = prompt.ask(request).await;
                Some(TodoItemAction::DeleteConfirmation { choice })
            })
            .cancellable(state.effect_id(ItemOperation::Delete), true)
        ]
    }

    fn delete_confirmation(
        state: &mut TodoItemState,
        choice: Choice,
        env: &TodoItemEnvironment,
    ) -> Effects {
        if !state.confirming_delete {
            return SmallVec::new();
        }
        state.confirming_delete = false;

        if choice == Choice::Cancel {
            tracing::debug!(todo = %state.id, "Delete cancelled");
            return SmallVec::new();
        }

        if state.in_flight.toggle.is_some() {
            if let (FailurePolicy::Revert, Some(previous)) = (env.failure_policy, state.rollback.take()) {
                tracing::debug!(todo = %state.id, "Reverting unconfirmed toggle");
                state.complete = previous;
            }
        }
        state.abandon(ItemOperation::Toggle);
        state.abandon(ItemOperation::Edit);
        state.error = None;
        let request = state.begin(ItemOperation::Delete);

        tracing::debug!(todo = %state.id, request, "Deleting todo");

        let service = env.service.clone();
        let user = state.user_id.clone();
        let id = state.id.clone();

        smallvec![
            Effect::Cancel(state.effect_id(ItemOperation::Toggle)),
            Effect::Cancel(state.effect_id(ItemOperation::Edit)),
            Effect::future(async move {
                let result = service.delete(&user, &id).await;
                Some(TodoItemAction::Deleted { request, result })
            })
            .cancellable(state.effect_id(ItemOperation::Delete), false),
        ]
    }

    fn deleted(
        state: &mut TodoItemState,
        request: RequestId,
        result: Result<Option<Todo>, ApiError>,
        env: &TodoItemEnvironment,
    ) -> Effects {
        if !state.finish(ItemOperation::Delete, request) {
            tracing::debug!(todo = %state.id, request, "Discarding stale delete response");
            return SmallVec::new();
        }

        match result {
            Ok(Some(todo)) => {
                env.list.remove_by_id(&todo.id);
                if todo.id == state.id {
                    state.deleted = true;
                    state.editing = false;
                } else {
                    tracing::warn!(todo = %state.id, response = %todo.id, "Delete answered for another todo");
                }
            },
            Ok(None) => {
                tracing::warn!(todo = %state.id, "Delete returned no record");
                state.error = Some(ApiError::NotFound.to_string());
            },
            Err(error) => {
                tracing::warn!(todo = %state.id, error = %error, "Delete failed");
                state.error = Some(error.to_string());
            },
        }
        SmallVec::new()
    }

    fn sync_from_list(state: &mut TodoItemState, todo: &Todo) -> Effects {
        if todo.id != state.id || state.in_flight.toggle.is_some() {
            return SmallVec::new();
        }
        state.complete = todo.complete;
        SmallVec::new()
    }

    fn dismiss(state: &mut TodoItemState) -> Effects {
        let effects = ItemOperation::ALL
            .into_iter()
            .filter(|operation| {
                state.in_flight.get(*operation).is_some()
                    || (*operation == ItemOperation::Delete && state.confirming_delete)
            })
            .map(|operation| Effect::Cancel(state.effect_id(operation)))
            .collect();

        for operation in ItemOperation::ALL {
            state.abandon(operation);
        }
        state.confirming_delete = false;
        state.loading = false;

        tracing::debug!(todo = %state.id, "Dismissed");
        effects
    }
}

impl Reducer for TodoItemReducer {
    type State = TodoItemState;
    type Action = TodoItemAction;
    type Environment = TodoItemEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Intents ==========
            TodoItemAction::ToggleComplete => Self::toggle_complete(state, env),
            TodoItemAction::ToggleEditing => Self::toggle_editing(state),
            TodoItemAction::SubmitEdit { text } => Self::submit_edit(state, text, env),
            TodoItemAction::DeleteRequested => Self::delete_requested(state, env),
            TodoItemAction::SyncFromList { todo } => Self::sync_from_list(state, &todo),
            TodoItemAction::Dismiss => Self::dismiss(state),

            // ========== Feedback ==========
            TodoItemAction::DeleteConfirmation { choice } => {
                Self::delete_confirmation(state, choice, env)
            },
            TodoItemAction::ToggleCompleted { request, result } => {
                Self::toggle_completed(state, request, result, env)
            },
            TodoItemAction::EditSubmitted { request, result } => {
                Self::edit_submitted(state, request, result, env)
            },
            TodoItemAction::Deleted { request, result } => {
                Self::deleted(state, request, result, env)
            },
        }
    }
}
