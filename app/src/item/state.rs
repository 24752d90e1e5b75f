//! Shadow state of one todo item

use composable_todo_api::{Todo, TodoId, UserId};
use composable_todo_core::effect::EffectId;
use std::fmt;

/// Identifies one request issued by an item
pub type RequestId = u64;

/// Network operations an item can have in flight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemOperation {
    /// `PUT {complete}`
    Toggle,
    /// `PUT {text}`
    Edit,
    /// Delete confirmation followed by `DELETE`
    Delete,
}

impl ItemOperation {
    /// Every operation
    pub const ALL: [Self; 3] = [Self::Toggle, Self::Edit, Self::Delete];

    /// Short name used in cancellation ids
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ItemOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request currently awaited for each operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InFlight {
    /// Pending toggle
    pub toggle: Option<RequestId>,
    /// Pending text edit
    pub edit: Option<RequestId>,
    /// Pending delete
    pub delete: Option<RequestId>,
}

impl InFlight {
    /// Request awaited for `operation`
    #[must_use]
    pub const fn get(&self, operation: ItemOperation) -> Option<RequestId> {
        match operation {
            ItemOperation::Toggle => self.toggle,
            ItemOperation::Edit => self.edit,
            ItemOperation::Delete => self.delete,
        }
    }

    fn slot(&mut self, operation: ItemOperation) -> &mut Option<RequestId> {
        match operation {
            ItemOperation::Toggle => &mut self.toggle,
            ItemOperation::Edit => &mut self.edit,
            ItemOperation::Delete => &mut self.delete,
        }
    }

    /// Returns `true` if any request is awaited
    #[must_use]
    pub const fn any(&self) -> bool {
        self.toggle.is_some() || self.edit.is_some() || self.delete.is_some()
    }
}

/// Local copy of one todo plus the bookkeeping of its in-flight requests
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoItemState {
    /// Id of the todo
    pub id: TodoId,
    /// Owner of the todo, used in request URLs
    pub user_id: UserId,
    /// Text, provisional while an edit is in flight
    pub text: String,
    /// Completion, provisional while a toggle is in flight
    pub complete: bool,
    /// Edit mode
    pub editing: bool,
    /// A request is running
    pub loading: bool,
    /// Last request error
    pub error: Option<String>,
    /// Error shown under the edit field
    pub field_error: Option<String>,
    /// The delete confirmation prompt is open
    pub confirming_delete: bool,
    /// The todo was deleted; further intents are ignored
    pub deleted: bool,
    /// Requests awaited per operation
    pub in_flight: InFlight,
    /// `complete` as it was before the first unconfirmed toggle
    pub rollback: Option<bool>,
    next_request: RequestId,
}

impl TodoItemState {
    /// Shadow state for `todo` in its initial mode (viewing, idle, no error)
    #[must_use]
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            user_id: todo.user_id.clone(),
            text: todo.text.clone(),
            complete: todo.complete,
            editing: false,
            loading: false,
            error: None,
            field_error: None,
            confirming_delete: false,
            deleted: false,
            in_flight: InFlight::default(),
            rollback: None,
            next_request: 0,
        }
    }

    /// Edit mode
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Cancellation id of `operation` for this item
    #[must_use]
    pub fn effect_id(&self, operation: ItemOperation) -> EffectId {
        EffectId::new(format!("todo/{}/{operation}", self.id))
    }

    /// Allocate the next request id and mark it awaited for `operation`
    pub(crate) fn begin(&mut self, operation: ItemOperation) -> RequestId {
        self.next_request += 1;
        let request = self.next_request;
        *self.in_flight.slot(operation) = Some(request);
        self.loading = true;
        request
    }

    /// Finish `request` for `operation`
    ///
    /// Returns `false` if the request is no longer awaited (superseded,
    /// cancelled or dismissed); the caller must then leave state alone.
    pub(crate) fn finish(&mut self, operation: ItemOperation, request: RequestId) -> bool {
        let slot = self.in_flight.slot(operation);
        if *slot != Some(request) {
            return false;
        }
        *slot = None;
        self.loading = self.in_flight.any();
        true
    }

    /// Stop awaiting `operation` without a response
    pub(crate) fn abandon(&mut self, operation: ItemOperation) {
        *self.in_flight.slot(operation) = None;
        if operation == ItemOperation::Toggle {
            self.rollback = None;
        }
        self.loading = self.in_flight.any();
    }
}
