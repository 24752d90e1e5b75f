//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the composable todo client.
//!
//! This crate provides:
//! - [`MockTodoService`]: an in-memory remote service with scripted failures
//!   and held responses
//! - [`ReducerTest`]: Given-When-Then testing for reducers
//! - Fixtures and proptest strategies for todo collections
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{fixtures, helpers, MockTodoService};
//!
//! #[tokio::test]
//! async fn toggle_reconciles() {
//!     let service = MockTodoService::with_todos(vec![fixtures::todo("1", "Buy milk", false)]);
//!     let controller = controller_for(&service);
//!
//!     helpers::settle(controller.toggle_complete().await.unwrap()).await;
//!
//!     assert!(controller.snapshot().await.complete);
//! }
//! ```

mod service_mocks;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of the service seam
pub mod mocks {
    pub use crate::service_mocks::{MockTodoService, ServiceCall};
}

/// Test data builders
pub mod fixtures {
    use composable_todo_api::Todo;

    /// User every fixture todo belongs to
    pub const USER: &str = "u1";

    /// Timestamp every fixture todo was created at
    pub const CREATED_AT: &str = "2025-01-01T00:00:00Z";

    /// A todo owned by [`USER`]
    #[must_use]
    pub fn todo(id: &str, text: &str, complete: bool) -> Todo {
        let mut todo = Todo::new(id, USER, text, complete);
        todo.created_at = CREATED_AT.to_string();
        todo
    }
}

/// Test helpers and utilities
pub mod helpers {
    use composable_todo_runtime::EffectHandle;
    use std::time::Duration;

    /// Upper bound for effect cascades in tests
    pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Wait until every effect tracked by `handle` has finished
    ///
    /// # Panics
    ///
    /// Panics if the effects do not finish within [`SETTLE_TIMEOUT`].
    #[allow(clippy::panic)] // Test helper
    pub async fn settle(mut handle: EffectHandle) {
        if let Err(error) = handle.wait_with_timeout(SETTLE_TIMEOUT).await {
            panic!("effects did not settle: {error}");
        }
    }

    /// Let spawned tasks make progress without advancing any state
    pub async fn yield_now() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Property-based testing utilities using proptest
pub mod properties {
    use crate::fixtures;
    use composable_todo_api::Todo;
    use proptest::prelude::*;

    /// Arbitrary todo text, never blank
    pub fn todo_text() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9 ]{0,15}"
    }

    /// A list of todos with unique ids `"0"`, `"1"`, ...
    pub fn todo_list(max_len: usize) -> impl Strategy<Value = Vec<Todo>> {
        prop::collection::vec((todo_text(), any::<bool>()), 0..=max_len).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(index, (text, complete))| {
                    fixtures::todo(&index.to_string(), &text, complete)
                })
                .collect()
        })
    }
}

// Re-export commonly used items
pub use mocks::{MockTodoService, ServiceCall};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixture_todos_belong_to_fixture_user() {
        let todo = fixtures::todo("7", "Walk dog", true);
        assert_eq!(todo.user_id.as_str(), fixtures::USER);
        assert!(todo.created_at_utc().is_some());
    }

    proptest! {
        #[test]
        fn generated_lists_have_unique_ids(todos in properties::todo_list(12)) {
            let mut ids: Vec<_> = todos.iter().map(|t| t.id.clone()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), todos.len());
        }
    }
}
