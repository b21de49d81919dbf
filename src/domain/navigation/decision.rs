//! Navigation decision types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the presentation layer should do with the requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum NavigationDecision {
    Render,
    RedirectTo(String),
    ShowLoading,
}

impl NavigationDecision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, NavigationDecision::RedirectTo(_))
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            NavigationDecision::RedirectTo(target) => Some(target),
            _ => None,
        }
    }
}

/// Which guard rule matched, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    LoadingTimedOut,
    ProfileFetchError,
    StillInitializing,
    Unauthenticated,
    AuthenticatedNoProfileYet,
    OnboardingRequired,
    OnboardingAlreadyDone,
    Default,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::LoadingTimedOut => "loading_timed_out",
            GuardState::ProfileFetchError => "profile_fetch_error",
            GuardState::StillInitializing => "still_initializing",
            GuardState::Unauthenticated => "unauthenticated",
            GuardState::AuthenticatedNoProfileYet => "authenticated_no_profile_yet",
            GuardState::OnboardingRequired => "onboarding_required",
            GuardState::OnboardingAlreadyDone => "onboarding_already_done",
            GuardState::Default => "default",
        }
    }
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One evaluation of the resolver.
///
/// `remember` carries the intended-destination write for the caller to apply;
/// the resolver itself never touches the memory slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub state: GuardState,
    pub decision: NavigationDecision,
    pub remember: Option<String>,
}
