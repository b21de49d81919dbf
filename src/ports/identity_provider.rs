//! Identity provider port.
//!
//! The external sign-in service owns the session. This crate only reads the
//! current session, listens to its change events and asks it to sign out.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::AuthError;
use crate::domain::session::{AuthEvent, Session};

/// Source of the current browser identity.
///
/// # Contract
///
/// - `get_session` returns `Ok(None)` when nobody is signed in; errors are
///   reserved for an unreachable provider
/// - `subscribe` hands out a fresh receiver; events sent before subscribing
///   are not replayed
/// - `sign_out` must emit `AuthEvent::SignedOut` to subscribers
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
