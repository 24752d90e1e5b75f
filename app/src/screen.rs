//! Todo list screen
//!
//! Loads the signed-in user's todos into the shared [`TodoList`], creates new
//! todos and selects the filter. Items are handled by
//! [`TodoItemController`](crate::item::TodoItemController).

use crate::auth::AuthContext;
use crate::error::{AuthError, ControllerError, ValidationError};
use crate::filter::Filter;
use crate::list::TodoList;
use composable_todo_api::{ApiError, Todo, TodoService, UserId};
use composable_todo_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec, SmallVec,
};
use composable_todo_runtime::{EffectHandle, Store};
use std::sync::Arc;

/// Cancellation id of the list request
pub const LOAD_EFFECT: &str = "todos/load";

/// State of the list screen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListScreenState {
    /// User whose todos are shown
    pub user_id: Option<UserId>,
    /// A request is running
    pub loading: bool,
    /// Last request error
    pub error: Option<String>,
    /// Error shown under the new-todo field
    pub field_error: Option<String>,
}

/// Actions of the list screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoListAction {
    /// Fetch the signed-in user's todos
    Load,
    /// Response to [`TodoListAction::Load`]
    Loaded {
        /// Todos or failure
        result: Result<Vec<Todo>, ApiError>,
    },
    /// Create a todo
    Add {
        /// Text entered by the user
        text: String,
    },
    /// Response to [`TodoListAction::Add`]
    Added {
        /// Created todo or failure
        result: Result<Todo, ApiError>,
    },
    /// Select a filter
    SetFilter {
        /// New filter
        filter: Filter,
    },
}

/// Dependencies of the list screen
#[derive(Clone)]
pub struct TodoListEnvironment {
    /// Remote service
    pub service: Arc<dyn TodoService>,
    /// Shared collection
    pub list: TodoList,
    /// Signed-in user
    pub auth: AuthContext,
}

impl TodoListEnvironment {
    /// Creates a new `TodoListEnvironment`
    #[must_use]
    pub fn new(service: Arc<dyn TodoService>, list: TodoList, auth: AuthContext) -> Self {
        Self {
            service,
            list,
            auth,
        }
    }
}

/// Reducer for [`TodoListScreenState`]
#[derive(Clone, Debug, Default)]
pub struct TodoListReducer;

impl TodoListReducer {
    /// Creates a new `TodoListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn signed_in_user(state: &mut TodoListScreenState, env: &TodoListEnvironment) -> Option<UserId> {
        let user = env.auth.user_id();
        if user.is_none() {
            state.error = Some(AuthError::NotSignedIn.to_string());
        }
        state.user_id.clone_from(&user);
        user
    }
}

impl Reducer for TodoListReducer {
    type State = TodoListScreenState;
    type Action = TodoListAction;
    type Environment = TodoListEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoListAction::Load => {
                let Some(user) = Self::signed_in_user(state, env) else {
                    return SmallVec::new();
                };
                state.loading = true;
                state.error = None;

                let service = env.service.clone();
                smallvec![
                    Effect::future(async move {
                        let result = service.list(&user).await;
                        Some(TodoListAction::Loaded { result })
                    })
                    .cancellable(EffectId::new(LOAD_EFFECT), true)
                ]
            },
            TodoListAction::Loaded { result } => {
                state.loading = false;
                match result {
                    Ok(todos) => {
                        tracing::debug!(count = todos.len(), "Loaded todos");
                        env.list.set_todos(todos);
                    },
                    Err(error) => {
                        tracing::warn!(error = %error, "Loading todos failed");
                        state.error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },
            TodoListAction::Add { text } => {
                if text.trim().is_empty() {
                    state.field_error = Some(ValidationError::Required.to_string());
                    return SmallVec::new();
                }
                let Some(user) = Self::signed_in_user(state, env) else {
                    return SmallVec::new();
                };
                state.field_error = None;
                state.loading = true;

                let service = env.service.clone();
                smallvec![Effect::future(async move {
                    let result = service.create(&user, &text).await;
                    Some(TodoListAction::Added { result })
                })]
            },
            TodoListAction::Added { result } => {
                state.loading = false;
                match result {
                    Ok(todo) => {
                        tracing::debug!(todo = %todo.id, "Created todo");
                        env.list.push(todo);
                    },
                    Err(error) => {
                        tracing::warn!(error = %error, "Creating todo failed");
                        state.error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },
            TodoListAction::SetFilter { filter } => {
                env.list.set_current_filter(filter);
                SmallVec::new()
            },
        }
    }
}

type ScreenStore = Store<TodoListScreenState, TodoListAction, TodoListEnvironment, TodoListReducer>;

/// Store owner for the list screen
#[derive(Clone)]
pub struct TodoListScreen {
    store: ScreenStore,
}

impl TodoListScreen {
    /// Creates the screen
    #[must_use]
    pub fn new(environment: TodoListEnvironment) -> Self {
        Self {
            store: Store::new(TodoListScreenState::default(), TodoListReducer::new(), environment),
        }
    }

    /// Shared collection shown by the screen
    #[must_use]
    pub fn list(&self) -> &TodoList {
        &self.store.environment().list
    }

    /// Fetch the signed-in user's todos
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the store is shutting down.
    pub async fn load(&self) -> Result<EffectHandle, ControllerError> {
        Ok(self.store.send(TodoListAction::Load).await?)
    }

    /// Create a todo
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for blank text (no request is
    /// issued) and [`ControllerError::Store`] if the store is shutting down.
    pub async fn add(&self, text: impl Into<String>) -> Result<EffectHandle, ControllerError> {
        let text = text.into();
        let blank = text.trim().is_empty();
        let handle = self.store.send(TodoListAction::Add { text }).await?;
        if blank {
            return Err(ValidationError::Required.into());
        }
        Ok(handle)
    }

    /// Select a filter
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Store`] if the store is shutting down.
    pub async fn set_filter(&self, filter: Filter) -> Result<EffectHandle, ControllerError> {
        Ok(self.store.send(TodoListAction::SetFilter { filter }).await?)
    }

    /// Copy of the screen state
    pub async fn snapshot(&self) -> TodoListScreenState {
        self.store.state(|state| state.clone()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::User;
    use composable_todo_testing::{assertions, fixtures, helpers, MockTodoService, ReducerTest};

    fn env(service: MockTodoService, auth: AuthContext) -> TodoListEnvironment {
        TodoListEnvironment::new(Arc::new(service), TodoList::default(), auth)
    }

    fn alice() -> AuthContext {
        AuthContext::signed_in(User::new(fixtures::USER, "alice"))
    }

    #[test]
    fn load_requires_signed_in_user() {
        ReducerTest::new(TodoListReducer::new())
            .with_env(env(MockTodoService::new(), AuthContext::default()))
            .given_state(TodoListScreenState::default())
            .when_action(TodoListAction::Load)
            .then_state(|state| {
                assert!(!state.loading);
                assert_eq!(state.error.as_deref(), Some("Not signed in"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn blank_add_is_required() {
        ReducerTest::new(TodoListReducer::new())
            .with_env(env(MockTodoService::new(), alice()))
            .given_state(TodoListScreenState::default())
            .when_action(TodoListAction::Add {
                text: " ".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.field_error.as_deref(), Some("Required"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failed_load_keeps_collection() {
        let environment = env(MockTodoService::new(), alice());
        environment.list.set_todos(vec![fixtures::todo("1", "Buy milk", false)]);
        let list = environment.list.clone();

        ReducerTest::new(TodoListReducer::new())
            .with_env(environment)
            .given_state(TodoListScreenState {
                loading: true,
                ..TodoListScreenState::default()
            })
            .when_action(TodoListAction::Loaded {
                result: Err(ApiError::Timeout),
            })
            .then_state(move |state| {
                assert!(!state.loading);
                assert_eq!(state.error.as_deref(), Some("Request timed out"));
                assert_eq!(list.len(), 1);
            })
            .run();
    }

    #[tokio::test]
    async fn load_replaces_shared_collection() {
        let service = MockTodoService::with_todos(vec![
            fixtures::todo("1", "Buy milk", false),
            fixtures::todo("2", "Walk dog", true),
        ]);
        let screen = TodoListScreen::new(env(service, alice()));
        screen.list().set_todos(vec![fixtures::todo("9", "Stale", false)]);

        helpers::settle(screen.load().await.unwrap()).await;

        assert_eq!(screen.list().len(), 2);
        assert_eq!(screen.list().count(), 1);
        let state = screen.snapshot().await;
        assert!(!state.loading);
        assert_eq!(state.user_id, Some(UserId::new(fixtures::USER)));
    }

    #[tokio::test]
    async fn add_appends_created_todo() {
        let service = MockTodoService::with_todos(vec![fixtures::todo("1", "Buy milk", false)]);
        let screen = TodoListScreen::new(env(service.clone(), alice()));
        helpers::settle(screen.load().await.unwrap()).await;

        helpers::settle(screen.add("Call mom").await.unwrap()).await;

        let texts: Vec<_> = screen.list().todos().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["Buy milk", "Call mom"]);
        assert_eq!(service.todos().len(), 2);
    }

    #[tokio::test]
    async fn blank_add_issues_no_request() {
        let service = MockTodoService::new();
        let screen = TodoListScreen::new(env(service.clone(), alice()));

        let result = screen.add("   ").await;

        assert_eq!(result.unwrap_err(), ControllerError::Validation(ValidationError::Required));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn set_filter_updates_visible_todos() {
        let service = MockTodoService::with_todos(vec![
            fixtures::todo("1", "Buy milk", false),
            fixtures::todo("2", "Walk dog", true),
        ]);
        let screen = TodoListScreen::new(env(service, alice()));
        helpers::settle(screen.load().await.unwrap()).await;

        screen.set_filter(Filter::Completed).await.unwrap();

        let visible: Vec<_> = screen.list().visible().into_iter().map(|t| t.text).collect();
        assert_eq!(visible, ["Walk dog"]);
    }
}
