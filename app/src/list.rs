//! Shared todo collection
//!
//! [`TodoList`] is the handle every screen and item controller receives. It
//! wraps a [`tokio::sync::watch`] channel: reads borrow the latest snapshot,
//! writes are read-modify-write closures applied under the channel's lock, so
//! two items reconciling at the same time never overwrite each other's entry
//! with a stale copy of the collection.

use crate::filter::Filter;
use composable_todo_api::{Todo, TodoId};
use std::sync::Arc;
use tokio::sync::watch;

/// Contents of the shared collection at one point in time
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListSnapshot {
    /// Todos in insertion order
    pub todos: Vec<Todo>,
    /// Filter selected on the list screen
    pub current_filter: Filter,
}

impl TodoListSnapshot {
    /// Number of todos still active
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.iter().filter(|t| !t.complete).count()
    }

    /// Todos matching the current filter
    #[must_use]
    pub fn visible(&self) -> Vec<Todo> {
        self.todos
            .iter()
            .filter(|t| self.current_filter.matches(t))
            .cloned()
            .collect()
    }
}

/// Cloneable handle to the shared todo collection
#[derive(Clone, Debug)]
pub struct TodoList {
    tx: Arc<watch::Sender<TodoListSnapshot>>,
}

impl TodoList {
    /// Create a collection holding `todos`
    #[must_use]
    pub fn new(todos: Vec<Todo>) -> Self {
        Self::with_filter(todos, Filter::default())
    }

    /// Create a collection with an initial filter
    #[must_use]
    pub fn with_filter(todos: Vec<Todo>, current_filter: Filter) -> Self {
        let (tx, _rx) = watch::channel(TodoListSnapshot {
            todos,
            current_filter,
        });
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the whole collection state
    #[must_use]
    pub fn snapshot(&self) -> TodoListSnapshot {
        self.tx.borrow().clone()
    }

    /// Copy of the todos in insertion order
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.tx.borrow().todos.clone()
    }

    /// Replace the whole collection
    pub fn set_todos(&self, todos: Vec<Todo>) {
        self.tx.send_modify(|snapshot| snapshot.todos = todos);
    }

    /// Filter selected on the list screen
    #[must_use]
    pub fn current_filter(&self) -> Filter {
        self.tx.borrow().current_filter
    }

    /// Select a different filter
    pub fn set_current_filter(&self, filter: Filter) {
        self.tx.send_if_modified(|snapshot| {
            let changed = snapshot.current_filter != filter;
            snapshot.current_filter = filter;
            changed
        });
    }

    /// Number of active todos ("items left")
    #[must_use]
    pub fn count(&self) -> usize {
        self.tx.borrow().count()
    }

    /// Total number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.borrow().todos.len()
    }

    /// Returns `true` if the collection holds no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().todos.is_empty()
    }

    /// Todos matching the current filter
    #[must_use]
    pub fn visible(&self) -> Vec<Todo> {
        self.tx.borrow().visible()
    }

    /// Look up a todo by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<Todo> {
        self.tx.borrow().todos.iter().find(|t| &t.id == id).cloned()
    }

    /// Apply `f` to the todos atomically
    ///
    /// Subscribers are notified even if `f` leaves the todos unchanged.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<Todo>),
    {
        self.tx.send_modify(|snapshot| f(&mut snapshot.todos));
    }

    /// Replace the entry with the same id, keeping its position
    ///
    /// Returns `false` (and leaves the collection untouched) if no entry has
    /// that id.
    pub fn replace_by_id(&self, todo: Todo) -> bool {
        let mut found = false;
        self.tx.send_if_modified(|snapshot| {
            let Some(entry) = snapshot.todos.iter_mut().find(|t| t.id == todo.id) else {
                return false;
            };
            found = true;
            if *entry == todo {
                return false;
            }
            *entry = todo;
            true
        });
        found
    }

    /// Remove every entry with `id`, keeping the order of the rest
    ///
    /// Returns the first removed entry.
    pub fn remove_by_id(&self, id: &TodoId) -> Option<Todo> {
        let mut removed = None;
        self.tx.send_if_modified(|snapshot| {
            let before = snapshot.todos.len();
            snapshot.todos.retain(|t| {
                if &t.id == id {
                    removed.get_or_insert_with(|| t.clone());
                    false
                } else {
                    true
                }
            });
            snapshot.todos.len() != before
        });
        removed
    }

    /// Append a todo
    pub fn push(&self, todo: Todo) {
        self.tx.send_modify(|snapshot| snapshot.todos.push(todo));
    }

    /// Receive every change to the collection
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TodoListSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
