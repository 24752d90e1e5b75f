//! # Remote Todo Service
//!
//! Client for the mock REST API that stores todos per user.
//!
//! ## Example
//!
//! ```no_run
//! use composable_todo_api::{ApiConfig, HttpTodoService, TodoPatch, TodoService, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = HttpTodoService::new(&ApiConfig::from_env()?)?;
//!     let user = UserId::new("1");
//!
//!     for todo in service.list(&user).await? {
//!         println!("[{}] {}", if todo.complete { "x" } else { " " }, todo.text);
//!     }
//!
//!     let id = "1".into();
//!     let updated = service
//!         .update(&user, &id, &TodoPatch::Complete { complete: true })
//!         .await?;
//!     println!("completed: {}", updated.complete);
//!     Ok(())
//! }
//! ```
//!
//! ## Wire format
//!
//! - `GET /users/{userId}/todos` → array of todos
//! - `GET /users/{userId}/todos/{id}` → todo or `"Not found"`
//! - `POST /users/{userId}/todos` with `{text, complete}` → created todo
//! - `PUT /users/{userId}/todos/{id}` with `{complete}` or `{text}` → todo or `"Not found"`
//! - `DELETE /users/{userId}/todos/{id}` → deleted todo, or nothing

pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod types;

// Re-export main types for convenience
pub use client::HttpTodoService;
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError};
pub use service::TodoService;
pub use types::{NewTodo, Todo, TodoId, TodoPatch, UserId};
