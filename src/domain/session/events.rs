//! Identity provider events.

use serde::{Deserialize, Serialize};

use super::Session;

/// Change notifications emitted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

impl AuthEvent {
    /// The session this event leaves in place, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => Some(session),
            AuthEvent::SignedOut => None,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "signed_in",
            AuthEvent::SignedOut => "signed_out",
            AuthEvent::TokenRefreshed(_) => "token_refreshed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn signed_out_carries_no_session() {
        assert!(AuthEvent::SignedOut.session().is_none());
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = AuthEvent::SignedIn(Session::new(UserId::new("u1").unwrap()));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"signed_in\""));
        assert_eq!(event.event_type(), "signed_in");
    }
}
