//! Authentication context
//!
//! [`AuthContext`] holds the signed-in user and the sign-in progress flag.
//! Credentials are checked by an injected [`Authenticator`]; the default
//! [`NoopAuthenticator`] never establishes a user.

use crate::error::AuthError;
use async_trait::async_trait;
use composable_todo_api::UserId;
use std::sync::Arc;
use tokio::sync::watch;

/// A signed-in user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Id used in todo service URLs
    pub id: UserId,
    /// Name the user signed in with
    pub username: String,
}

impl User {
    /// Creates a user
    #[must_use]
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// Observable authentication state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// A sign-in is in progress
    pub loading: bool,
    /// The signed-in user, if any
    pub user: Option<User>,
}

/// Checks credentials
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve `username`/`password` to a user
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the credentials are rejected or sign-in is
    /// not possible.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError>;
}

/// Authenticator that never signs anyone in
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAuthenticator;

#[async_trait]
impl Authenticator for NoopAuthenticator {
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<User, AuthError> {
        Err(AuthError::Unavailable)
    }
}

/// Cloneable handle to the authentication state
#[derive(Clone)]
pub struct AuthContext {
    state: Arc<watch::Sender<AuthState>>,
    authenticator: Arc<dyn Authenticator>,
}

impl AuthContext {
    /// Create a signed-out context backed by `authenticator`
    #[must_use]
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        let (state, _rx) = watch::channel(AuthState::default());
        Self {
            state: Arc::new(state),
            authenticator,
        }
    }

    /// Create a context in which `user` is already signed in
    #[must_use]
    pub fn signed_in(user: User) -> Self {
        let context = Self::default();
        context.state.send_modify(|state| state.user = Some(user));
        context
    }

    /// Sign in through the authenticator
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InProgress`] if another sign-in is running, or
    /// whatever the authenticator rejects the credentials with.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let started = self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            state.loading = true;
            true
        });
        if !started {
            return Err(AuthError::InProgress);
        }

        let guard = SignInGuard(&self.state);
        let result = self.authenticator.authenticate(username, password).await;

        if let Ok(user) = &result {
            self.state.send_modify(|state| {
                state.loading = false;
                state.user = Some(user.clone());
            });
        }
        drop(guard);

        match result {
            Ok(user) => {
                tracing::info!(user = %user.id, "Signed in");
                Ok(())
            },
            Err(error) => {
                tracing::warn!(error = %error, "Sign-in failed");
                Err(error)
            },
        }
    }

    /// Forget the signed-in user
    pub fn sign_out(&self) {
        self.state.send_if_modified(|state| state.user.take().is_some());
        tracing::info!("Signed out");
    }

    /// A sign-in is in progress
    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// The signed-in user
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Id of the signed-in user
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.state.borrow().user.as_ref().map(|user| user.id.clone())
    }

    /// Receive every change to the authentication state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

/// Clears `loading` when a sign-in ends, including when its future is dropped
struct SignInGuard<'a>(&'a watch::Sender<AuthState>);

impl Drop for SignInGuard<'_> {
    fn drop(&mut self) {
        self.0
            .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new(Arc::new(NoopAuthenticator))
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::sync::Notify;

    struct FixedAuthenticator;

    #[async_trait]
    impl Authenticator for FixedAuthenticator {
        async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
            if password == "secret" {
                Ok(User::new("u1", username))
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    struct GatedAuthenticator(Arc<Notify>);

    #[async_trait]
    impl Authenticator for GatedAuthenticator {
        async fn authenticate(&self, username: &str, _password: &str) -> Result<User, AuthError> {
            self.0.notified().await;
            Ok(User::new("u1", username))
        }
    }

    #[tokio::test]
    async fn noop_authenticator_establishes_no_user() {
        let auth = AuthContext::default();
        assert_eq!(auth.sign_in("alice", "pw").await, Err(AuthError::Unavailable));
        assert_eq!(auth.user(), None);
        assert!(!auth.loading());
    }

    #[tokio::test]
    async fn sign_in_and_out() {
        let auth = AuthContext::new(Arc::new(FixedAuthenticator));
        let mut rx = auth.subscribe();

        auth.sign_in("alice", "secret").await.unwrap();
        assert_eq!(auth.user_id(), Some(UserId::new("u1")));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        auth.sign_out();
        assert_eq!(auth.user(), None);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn rejected_credentials_leave_user_signed_out() {
        let auth = AuthContext::new(Arc::new(FixedAuthenticator));
        assert_eq!(
            auth.sign_in("alice", "wrong").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(auth.user(), None);
    }

    #[tokio::test]
    async fn loading_while_sign_in_runs() {
        let gate = Arc::new(Notify::new());
        let auth = AuthContext::new(Arc::new(GatedAuthenticator(Arc::clone(&gate))));

        let pending = {
            let auth = auth.clone();
            tokio::spawn(async move { auth.sign_in("alice", "pw").await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(auth.loading());
        assert_eq!(auth.sign_in("bob", "pw").await, Err(AuthError::InProgress));

        gate.notify_one();
        pending.await.unwrap().unwrap();
        assert!(!auth.loading());
        assert_eq!(auth.user().map(|u| u.username), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn abandoned_sign_in_does_not_block_the_next() {
        let gate = Arc::new(Notify::new());
        let auth = AuthContext::new(Arc::new(GatedAuthenticator(Arc::clone(&gate))));

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            auth.sign_in("alice", "pw"),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(!auth.loading());

        gate.notify_one();
        auth.sign_in("bob", "pw").await.unwrap();
        assert_eq!(auth.user().map(|u| u.username), Some("bob".to_string()));
        assert!(!auth.loading());
    }

    #[test]
    fn signed_in_context_has_user() {
        let auth = AuthContext::signed_in(User::new("u7", "carol"));
        assert_eq!(auth.user_id(), Some(UserId::new("u7")));
    }
}
