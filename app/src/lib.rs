//! # Composable Todo
//!
//! Todo client built on the reducer/effect/store runtime. Every todo item is
//! updated optimistically: the local copy changes at once, one request goes
//! to the remote service, and the response is reconciled into the item and
//! the shared list.
//!
//! - [`list::TodoList`]: shared collection with keyed, atomic updates
//! - [`auth::AuthContext`]: signed-in user
//! - [`item::TodoItemController`]: toggle, edit and delete one todo
//! - [`screen::TodoListScreen`]: load, add and filter todos
//!
//! ## Quick Start
//!
//! ```no_run
//! use composable_todo::auth::{AuthContext, User};
//! use composable_todo::item::{TodoItemController, TodoItemEnvironment};
//! use composable_todo::list::TodoList;
//! use composable_todo::prompt::StaticPrompt;
//! use composable_todo::screen::{TodoListEnvironment, TodoListScreen};
//! use composable_todo_api::{HttpTodoService, TodoService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service: Arc<dyn TodoService> = Arc::new(HttpTodoService::from_env()?);
//! let auth = AuthContext::signed_in(User::new("1", "alice"));
//! let list = TodoList::default();
//!
//! let screen = TodoListScreen::new(TodoListEnvironment::new(
//!     service.clone(),
//!     list.clone(),
//!     auth.clone(),
//! ));
//! screen.load().await?.wait().await;
//!
//! if let Some(todo) = list.todos().first() {
//!     let environment =
//!         TodoItemEnvironment::new(service, list.clone(), auth, Arc::new(StaticPrompt::confirming()));
//!     let item = TodoItemController::new(todo, environment);
//!     item.toggle_complete().await?.wait().await;
//!     println!("{} items left", list.count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod item;
pub mod list;
pub mod prompt;
pub mod screen;

// Re-export commonly used types
pub use auth::{AuthContext, User};
pub use config::{AppConfig, FailurePolicy};
pub use error::{AuthError, ControllerError, ValidationError};
pub use filter::Filter;
pub use item::{TodoItemAction, TodoItemController, TodoItemEnvironment, TodoItemState};
pub use list::TodoList;
pub use prompt::{Choice, ConfirmPrompt, ConfirmRequest, StaticPrompt};
pub use screen::{TodoListEnvironment, TodoListScreen};
