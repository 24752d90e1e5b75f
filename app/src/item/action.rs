//! Inputs of the item reducer

use super::state::RequestId;
use crate::prompt::Choice;
use composable_todo_api::{ApiError, Todo};

/// Everything that can happen to one todo item
///
/// The first group are user intents; the rest are fed back by effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoItemAction {
    /// Flip completion optimistically and `PUT {complete}`
    ToggleComplete,
    /// Switch between viewing and editing
    ToggleEditing,
    /// `PUT {text}` with the edited text
    SubmitEdit {
        /// Text entered by the user
        text: String,
    },
    /// Ask for confirmation, then delete
    DeleteRequested,
    /// The shared entry for this todo changed
    SyncFromList {
        /// New shared entry
        todo: Todo,
    },
    /// The item leaves view; cancel every request
    Dismiss,

    /// Answer to the delete confirmation
    DeleteConfirmation {
        /// What the user chose
        choice: Choice,
    },
    /// Response to a toggle request
    ToggleCompleted {
        /// Request this answers
        request: RequestId,
        /// Server record or failure
        result: Result<Todo, ApiError>,
    },
    /// Response to a text edit request
    EditSubmitted {
        /// Request this answers
        request: RequestId,
        /// Server record or failure
        result: Result<Todo, ApiError>,
    },
    /// Response to a delete request
    Deleted {
        /// Request this answers
        request: RequestId,
        /// Deleted record, `None` if the service returned nothing
        result: Result<Option<Todo>, ApiError>,
    },
}
