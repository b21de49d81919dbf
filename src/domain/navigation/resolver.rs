//! Route guard decision function.
//!
//! Rules are evaluated in priority order and the first match wins:
//!
//! 1. loading past the timeout with a session present -> recovery
//! 2. profile fetch failed with a session present -> recovery
//! 3. session not initialized, or anything still loading -> show loading
//! 4. no session -> login (remembering protected destinations)
//! 5. session but no profile row -> recovery
//! 6. onboarding incomplete, outside the onboarding flow -> onboarding
//! 7. onboarding complete, inside the onboarding flow -> default page
//! 8. otherwise render
//!
//! A redirect whose target is the requested path collapses to `Render`, so
//! every redirect target is a fixed point for an unchanged state.

use std::time::Duration;

use crate::domain::profile::ProfileState;
use crate::domain::session::SessionSnapshot;

use super::{GuardState, NavigationDecision, Resolution, RouteMap};

/// How long loading may last before an authenticated user is offered recovery.
pub const DEFAULT_LOADING_TIMEOUT: Duration = Duration::from_secs(10);

/// Pure resolver over `(session, profile, elapsed, path)`.
#[derive(Debug, Clone)]
pub struct NavigationResolver {
    routes: RouteMap,
    loading_timeout: Duration,
}

impl NavigationResolver {
    pub fn new(routes: RouteMap, loading_timeout: Duration) -> Self {
        Self {
            routes,
            loading_timeout,
        }
    }

    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    pub fn loading_timeout(&self) -> Duration {
        self.loading_timeout
    }

    /// Whether the guard is waiting on either store.
    ///
    /// The profile store only matters once a session exists.
    pub fn is_loading(&self, session: &SessionSnapshot, profile: &ProfileState) -> bool {
        !session.initialized
            || session.loading
            || (session.is_authenticated() && profile.is_loading())
    }

    pub fn resolve(
        &self,
        session: &SessionSnapshot,
        profile: &ProfileState,
        loading_elapsed: Duration,
        path: &str,
    ) -> Resolution {
        let has_session = session.is_authenticated();
        let loading = self.is_loading(session, profile);

        if has_session && loading && loading_elapsed >= self.loading_timeout {
            return self.redirect(GuardState::LoadingTimedOut, &self.routes.recovery, path);
        }

        if has_session && matches!(profile, ProfileState::FetchError(_)) {
            return self.redirect(GuardState::ProfileFetchError, &self.routes.recovery, path);
        }

        if loading {
            return Resolution {
                state: GuardState::StillInitializing,
                decision: NavigationDecision::ShowLoading,
                remember: None,
            };
        }

        if !has_session {
            let mut resolution = self.redirect(GuardState::Unauthenticated, &self.routes.login, path);
            if resolution.decision.is_redirect() && self.routes.is_protected(path) {
                resolution.remember = Some(path.to_string());
            }
            return resolution;
        }

        let profile = match profile {
            ProfileState::Ready(profile) => profile,
            _ => {
                return self.redirect(
                    GuardState::AuthenticatedNoProfileYet,
                    &self.routes.recovery,
                    path,
                )
            }
        };

        let in_onboarding_flow = self.routes.is_onboarding_flow(path);

        if !profile.onboarding_complete && !in_onboarding_flow {
            return self.redirect(GuardState::OnboardingRequired, &self.routes.onboarding, path);
        }

        if profile.onboarding_complete && in_onboarding_flow {
            return self.redirect(
                GuardState::OnboardingAlreadyDone,
                &self.routes.default_authenticated,
                path,
            );
        }

        Resolution {
            state: GuardState::Default,
            decision: NavigationDecision::Render,
            remember: None,
        }
    }

    fn redirect(&self, state: GuardState, target: &str, path: &str) -> Resolution {
        let decision = if RouteMap::same_path(target, path) {
            NavigationDecision::Render
        } else {
            NavigationDecision::RedirectTo(target.to_string())
        };
        Resolution {
            state,
            decision,
            remember: None,
        }
    }
}

impl Default for NavigationResolver {
    fn default() -> Self {
        Self::new(RouteMap::default(), DEFAULT_LOADING_TIMEOUT)
    }
}
