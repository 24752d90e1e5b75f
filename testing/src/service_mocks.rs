//! In-memory todo service for fast, deterministic tests
//!
//! [`MockTodoService`] behaves like the remote mock API (records keyed by
//! user and id, `"Not found"` semantics) and adds test controls:
//! - scripted failures and responses for the next calls
//! - a recorded call log
//! - a "held" mode where responses wait until the test releases them

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use async_trait::async_trait;
use composable_todo_api::{ApiError, Todo, TodoId, TodoPatch, TodoService, UserId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One request observed by [`MockTodoService`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceCall {
    /// `GET /users/{user}/todos`
    List {
        /// Owner
        user: UserId,
    },
    /// `GET /users/{user}/todos/{id}`
    Get {
        /// Owner
        user: UserId,
        /// Requested record
        id: TodoId,
    },
    /// `POST /users/{user}/todos`
    Create {
        /// Owner
        user: UserId,
        /// Text of the new record
        text: String,
    },
    /// `PUT /users/{user}/todos/{id}`
    Update {
        /// Owner
        user: UserId,
        /// Updated record
        id: TodoId,
        /// Body sent
        patch: TodoPatch,
    },
    /// `DELETE /users/{user}/todos/{id}`
    Delete {
        /// Owner
        user: UserId,
        /// Deleted record
        id: TodoId,
    },
}

/// Scripted answer consumed by the next matching call
#[derive(Clone, Debug)]
enum Scripted {
    Fail(ApiError),
    Update(Todo),
    Delete(Option<Todo>),
}

impl Scripted {
    /// Failures answer any call; canned records only the matching operation
    const fn answers(&self, call: &ServiceCall) -> bool {
        matches!(
            (self, call),
            (Self::Fail(_), _)
                | (Self::Update(_), ServiceCall::Update { .. })
                | (Self::Delete(_), ServiceCall::Delete { .. })
        )
    }
}

#[derive(Default)]
struct Inner {
    todos: Vec<Todo>,
    calls: Vec<ServiceCall>,
    scripted: VecDeque<Scripted>,
    next_id: u64,
}

/// In-memory implementation of [`TodoService`]
///
/// # Example
///
/// ```
/// use composable_todo_api::{TodoPatch, TodoService, UserId};
/// use composable_todo_testing::{fixtures, MockTodoService};
///
/// # async fn example() {
/// let service = MockTodoService::with_todos(vec![fixtures::todo("1", "Buy milk", false)]);
/// let updated = service
///     .update(&UserId::new("u1"), &"1".into(), &TodoPatch::Complete { complete: true })
///     .await
///     .unwrap();
/// assert!(updated.complete);
/// assert_eq!(service.calls().len(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct MockTodoService {
    inner: Arc<Mutex<Inner>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockTodoService {
    /// Empty service answering immediately
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Service pre-populated with records
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.len() as u64 + 1;
        Self {
            inner: Arc::new(Mutex::new(Inner {
                todos,
                next_id,
                ..Inner::default()
            })),
            gate: None,
        }
    }

    /// Hold every response until [`MockTodoService::release`] is called
    ///
    /// Calls are recorded as soon as they arrive; held responses are
    /// released in arrival order.
    #[must_use]
    pub fn held(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `n` held responses through
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ApiError) {
        self.inner.lock().unwrap().scripted.push_back(Scripted::Fail(error));
    }

    /// Make the next update answer with `todo` regardless of stored records
    pub fn respond_next_update(&self, todo: Todo) {
        self.inner.lock().unwrap().scripted.push_back(Scripted::Update(todo));
    }

    /// Make the next delete answer with `deleted` regardless of stored records
    pub fn respond_next_delete(&self, deleted: Option<Todo>) {
        self.inner.lock().unwrap().scripted.push_back(Scripted::Delete(deleted));
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Records currently stored
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.inner.lock().unwrap().todos.clone()
    }

    async fn begin(&self, call: ServiceCall) -> Option<Scripted> {
        let scripted = {
            let mut inner = self.inner.lock().unwrap();
            let fits = inner
                .scripted
                .front()
                .is_some_and(|scripted| scripted.answers(&call));
            inner.calls.push(call);
            if fits { inner.scripted.pop_front() } else { None }
        };

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        scripted
    }
}

impl Default for MockTodoService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoService for MockTodoService {
    async fn list(&self, user: &UserId) -> Result<Vec<Todo>, ApiError> {
        if let Some(Scripted::Fail(error)) = self.begin(ServiceCall::List { user: user.clone() }).await {
            return Err(error);
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner.todos.iter().filter(|t| &t.user_id == user).cloned().collect())
    }

    async fn get(&self, user: &UserId, id: &TodoId) -> Result<Todo, ApiError> {
        let call = ServiceCall::Get {
            user: user.clone(),
            id: id.clone(),
        };
        if let Some(Scripted::Fail(error)) = self.begin(call).await {
            return Err(error);
        }
        let inner = self.inner.lock().unwrap();
        inner
            .todos
            .iter()
            .find(|t| &t.user_id == user && &t.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create(&self, user: &UserId, text: &str) -> Result<Todo, ApiError> {
        let call = ServiceCall::Create {
            user: user.clone(),
            text: text.to_string(),
        };
        if let Some(Scripted::Fail(error)) = self.begin(call).await {
            return Err(error);
        }
        let mut inner = self.inner.lock().unwrap();
        let id = TodoId::new(inner.next_id.to_string());
        inner.next_id += 1;
        let mut todo = Todo::new(id, user.clone(), text, false);
        todo.created_at = "2025-01-01T00:00:00Z".to_string();
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, user: &UserId, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let call = ServiceCall::Update {
            user: user.clone(),
            id: id.clone(),
            patch: patch.clone(),
        };
        match self.begin(call).await {
            Some(Scripted::Fail(error)) => return Err(error),
            Some(Scripted::Update(todo)) => return Ok(todo),
            _ => {},
        }

        let mut inner = self.inner.lock().unwrap();
        let todo = inner
            .todos
            .iter_mut()
            .find(|t| &t.user_id == user && &t.id == id)
            .ok_or(ApiError::NotFound)?;
        match patch {
            TodoPatch::Complete { complete } => todo.complete = *complete,
            TodoPatch::Text { text } => todo.text.clone_from(text),
        }
        Ok(todo.clone())
    }

    async fn delete(&self, user: &UserId, id: &TodoId) -> Result<Option<Todo>, ApiError> {
        let call = ServiceCall::Delete {
            user: user.clone(),
            id: id.clone(),
        };
        match self.begin(call).await {
            Some(Scripted::Fail(error)) => return Err(error),
            Some(Scripted::Delete(deleted)) => return Ok(deleted),
            _ => {},
        }

        let mut inner = self.inner.lock().unwrap();
        let position = inner
            .todos
            .iter()
            .position(|t| &t.user_id == user && &t.id == id);
        Ok(position.map(|index| inner.todos.remove(index)))
    }
}
