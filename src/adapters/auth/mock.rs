//! Mock authentication adapters for testing.
//!
//! `MockSessionValidator` maps fixed tokens to users. `MockIdentityProvider`
//! plays the browser-side identity service: tests sign users in and out and
//! subscribers see the same events a real provider would emit.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_test_user("valid-token", "user-123");
//! let user = validator.validate("valid-token").await?;
//!
//! let provider = MockIdentityProvider::new();
//! let mut events = provider.subscribe();
//! provider.sign_in(Session::new(user.id));
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::domain::session::{AuthEvent, Session};
use crate::ports::{IdentityProvider, SessionValidator};

const EVENT_CAPACITY: usize = 16;

/// Mock session validator for testing.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation while set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a token for a user with a generated email.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is blank.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(&user_id).expect("test user id must not be blank"),
            Some(format!("{}@test.example.com", user_id)),
        );
        self.with_user(token, user)
    }

    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Mock identity provider for testing.
#[derive(Debug)]
pub struct MockIdentityProvider {
    session: RwLock<Option<Session>>,
    force_error: RwLock<Option<AuthError>>,
    events: broadcast::Sender<AuthEvent>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: RwLock::new(None),
            force_error: RwLock::new(None),
            events,
        }
    }

    /// Starts with `session` already signed in, without emitting an event.
    pub fn with_session(self, session: Session) -> Self {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self
    }

    /// Makes `get_session` fail until `clear_error`.
    pub fn fail_with(&self, error: AuthError) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn sign_in(&self, session: Session) {
        self.set_session(Some(session.clone()));
        self.emit(AuthEvent::SignedIn(session));
    }

    pub fn refresh_token(&self, session: Session) {
        self.set_session(Some(session.clone()));
        self.emit(AuthEvent::TokenRefreshed(session));
    }

    fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }
        Ok(self
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_session(None);
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}
