//! Store owner for one todo item

use super::action::TodoItemAction;
use super::environment::TodoItemEnvironment;
use super::reducer::TodoItemReducer;
use super::state::{ItemOperation, TodoItemState};
use crate::error::{ControllerError, ValidationError};
use composable_todo_api::{Todo, TodoId};
use composable_todo_runtime::{EffectHandle, Store};
use tokio::sync::broadcast;

type ItemStore = Store<TodoItemState, TodoItemAction, TodoItemEnvironment, TodoItemReducer>;

/// Controller for one visible todo
///
/// Every operation returns the [`EffectHandle`] of the action it sent;
/// awaiting it waits for the request and its reconciliation.
///
/// # Example
///
/// ```ignore
/// let controller = TodoItemController::new(&todo, environment);
///
/// let mut handle = controller.toggle_complete().await?;
/// assert!(controller.snapshot().await.complete); // optimistic
///
/// handle.wait().await;
/// assert!(!controller.snapshot().await.loading); // reconciled
/// ```
#[derive(Clone)]
pub struct TodoItemController {
    id: TodoId,
    store: ItemStore,
}

impl TodoItemController {
    /// Create a controller for `todo` when it enters view
    #[must_use]
    pub fn new(todo: &Todo, environment: TodoItemEnvironment) -> Self {
        tracing::debug!(todo = %todo.id, "Creating item controller");
        Self {
            id: todo.id.clone(),
            store: Store::new(TodoItemState::from_todo(todo), TodoItemReducer::new(), environment),
        }
    }

    /// Id of the controlled todo
    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    /// Flip completion optimistically and send it to the service
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the controller was dismissed.
    pub async fn toggle_complete(&self) -> Result<EffectHandle, ControllerError> {
        self.send(TodoItemAction::ToggleComplete).await
    }

    /// Switch between viewing and editing
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the controller was dismissed.
    pub async fn toggle_editing(&self) -> Result<EffectHandle, ControllerError> {
        self.send(TodoItemAction::ToggleEditing).await
    }

    /// Submit edited text
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for blank text (the field error
    /// is recorded and no request is issued), [`ValidationError::NotEditing`]
    /// outside edit mode, and [`ControllerError::Store`] if the controller
    /// was dismissed.
    pub async fn submit_edit(&self, text: impl Into<String>) -> Result<EffectHandle, ControllerError> {
        let text = text.into();
        if text.trim().is_empty() {
            self.send(TodoItemAction::SubmitEdit { text }).await?;
            return Err(ValidationError::Required.into());
        }
        if !self.store.state(|state| state.is_editing()).await {
            return Err(ValidationError::NotEditing.into());
        }
        self.send(TodoItemAction::SubmitEdit { text }).await
    }

    /// Ask for confirmation, then delete the todo
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the controller was dismissed.
    pub async fn delete_todo(&self) -> Result<EffectHandle, ControllerError> {
        self.send(TodoItemAction::DeleteRequested).await
    }

    /// Follow a change of the shared entry
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the controller was dismissed.
    pub async fn sync_from_list(&self, todo: Todo) -> Result<EffectHandle, ControllerError> {
        self.send(TodoItemAction::SyncFromList { todo }).await
    }

    /// Cancel every in-flight request; the item is leaving view
    ///
    /// Later calls fail with [`StoreError::ShutdownInProgress`](composable_todo_runtime::StoreError).
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the controller was already
    /// dismissed.
    pub async fn dismiss(&self) -> Result<(), ControllerError> {
        let mut handle = self.send(TodoItemAction::Dismiss).await?;
        handle.wait().await;
        if let Err(error) = self.store.shutdown(std::time::Duration::ZERO).await {
            tracing::debug!(todo = %self.id, error = %error, "Effects still unwinding after dismiss");
        }
        Ok(())
    }

    /// Copy of the item's current state
    pub async fn snapshot(&self) -> TodoItemState {
        self.store.state(|state| state.clone()).await
    }

    /// Returns `true` if a request for `operation` is still running
    pub async fn is_running(&self, operation: ItemOperation) -> bool {
        let id = self.store.state(|state| state.effect_id(operation)).await;
        self.store.running(&id) > 0
    }

    /// Receive the feedback actions of this item (responses, confirmations)
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TodoItemAction> {
        self.store.subscribe_actions()
    }

    async fn send(&self, action: TodoItemAction) -> Result<EffectHandle, ControllerError> {
        Ok(self.store.send(action).await?)
    }
}

impl std::fmt::Debug for TodoItemController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoItemController")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
