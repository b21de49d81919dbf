//! Tagged profile load state consumed by the route guard.

use super::Profile;

/// What the profile store currently knows.
///
/// `NotFound` is a valid transient state for a freshly signed-up user whose
/// row has not been provisioned yet. It is deliberately distinct from
/// `FetchError`, which is a genuine backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProfileState {
    #[default]
    Loading,
    NotFound,
    Ready(Profile),
    FetchError(String),
}

impl ProfileState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ProfileState::Loading)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            ProfileState::Ready(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProfileState::FetchError(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn default_is_loading() {
        assert!(ProfileState::default().is_loading());
    }

    #[test]
    fn not_found_and_fetch_error_are_distinguishable() {
        let missing = ProfileState::NotFound;
        let failed = ProfileState::FetchError("timeout".to_string());
        assert!(missing.error().is_none());
        assert_eq!(failed.error(), Some("timeout"));
        assert!(missing.profile().is_none());
        assert!(failed.profile().is_none());
    }

    #[test]
    fn ready_exposes_profile() {
        let profile = Profile::provision(UserId::new("u").unwrap(), 3);
        let state = ProfileState::Ready(profile.clone());
        assert_eq!(state.profile(), Some(&profile));
    }
}
