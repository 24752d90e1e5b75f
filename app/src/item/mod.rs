//! Single todo item with optimistic updates
//!
//! Each visible todo gets a [`TodoItemController`] that owns a store running
//! [`TodoItemReducer`]. User intents mutate the item's shadow state at once
//! and issue one request; the response is reconciled into the shadow state
//! and into the shared [`TodoList`](crate::list::TodoList).
//!
//! Every request is tagged with a cancellation id (`todo/<id>/toggle`,
//! `todo/<id>/edit`, `todo/<id>/delete`) and a request id kept in state, so
//! superseded or dismissed requests never touch state when they finish late.

mod action;
mod controller;
mod environment;
mod reducer;
mod state;

pub use action::TodoItemAction;
pub use controller::TodoItemController;
pub use environment::TodoItemEnvironment;
pub use reducer::TodoItemReducer;
pub use state::{InFlight, ItemOperation, RequestId, TodoItemState};
