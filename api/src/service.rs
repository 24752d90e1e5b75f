//! The remote todo service seam

use crate::{
    error::ApiError,
    types::{Todo, TodoId, TodoPatch, UserId},
};
use async_trait::async_trait;

/// Operations offered by the remote todo service
///
/// Every endpoint is keyed by the owning user. Implementations must be
/// shareable across tasks: controllers hold them as `Arc<dyn TodoService>`.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// `GET /users/{user}/todos`
    async fn list(&self, user: &UserId) -> Result<Vec<Todo>, ApiError>;

    /// `GET /users/{user}/todos/{id}`
    async fn get(&self, user: &UserId, id: &TodoId) -> Result<Todo, ApiError>;

    /// `POST /users/{user}/todos`
    async fn create(&self, user: &UserId, text: &str) -> Result<Todo, ApiError>;

    /// `PUT /users/{user}/todos/{id}` with a single-field body
    ///
    /// A `"Not found"` answer is reported as [`ApiError::NotFound`].
    async fn update(&self, user: &UserId, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ApiError>;

    /// `DELETE /users/{user}/todos/{id}`
    ///
    /// Returns the deleted record, or `None` when the service answered with
    /// nothing usable (absent record).
    async fn delete(&self, user: &UserId, id: &TodoId) -> Result<Option<Todo>, ApiError>;
}
