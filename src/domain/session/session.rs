//! Session identity and the observable snapshot the route guard samples.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// One authenticated identity for the lifetime of a browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Access token expiry, if the provider reports one.
    pub expires_at: Option<Timestamp>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            expires_at: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Point-in-time view of the session store.
///
/// `initialized` distinguishes "not yet determined" from "determined absent".
/// A present `session` is what makes the snapshot authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub initialized: bool,
    pub loading: bool,
}

impl SessionSnapshot {
    /// Initial state on page load: nothing known yet.
    pub fn uninitialized() -> Self {
        Self {
            session: None,
            initialized: false,
            loading: true,
        }
    }

    /// Identity determined and absent.
    pub fn signed_out() -> Self {
        Self {
            session: None,
            initialized: true,
            loading: false,
        }
    }

    /// Identity determined and present.
    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            initialized: true,
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.session.as_ref().map(|s| &s.user_id)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::uninitialized()
    }
}
