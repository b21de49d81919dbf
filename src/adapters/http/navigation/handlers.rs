//! HTTP handlers for navigation endpoints.
//!
//! The server has no long-lived session to watch, so each request builds a
//! one-off snapshot: the validated token is the session, the profile is read
//! straight from the repository, and no loading time has elapsed.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::OptionalAuth;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::navigation::NavigationResolver;
use crate::domain::profile::ProfileState;
use crate::domain::session::{Session, SessionSnapshot};
use crate::ports::ProfileRepository;

use super::dto::{NavigationParams, NavigationResponse};

#[derive(Clone)]
pub struct NavigationHandlers {
    resolver: NavigationResolver,
    profiles: Arc<dyn ProfileRepository>,
}

impl NavigationHandlers {
    pub fn new(resolver: NavigationResolver, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { resolver, profiles }
    }

    async fn profile_state(&self, user: &AuthenticatedUser) -> ProfileState {
        match self.profiles.find_by_user(&user.id).await {
            Ok(Some(profile)) => ProfileState::Ready(profile),
            Ok(None) => ProfileState::NotFound,
            Err(e) => ProfileState::FetchError(e.message),
        }
    }
}

/// GET /api/navigation?path= - Resolve the guard decision for a path
pub async fn resolve_navigation(
    State(handlers): State<NavigationHandlers>,
    OptionalAuth(user): OptionalAuth,
    Query(params): Query<NavigationParams>,
) -> Response {
    let (session, profile) = match &user {
        Some(user) => {
            let mut session = Session::new(user.id.clone());
            if let Some(email) = &user.email {
                session = session.with_email(email.clone());
            }
            (
                SessionSnapshot::signed_in(session),
                handlers.profile_state(user).await,
            )
        }
        None => (SessionSnapshot::signed_out(), ProfileState::NotFound),
    };

    let resolution = handlers
        .resolver
        .resolve(&session, &profile, Duration::ZERO, &params.path);

    tracing::debug!(
        path = %params.path,
        state = %resolution.state,
        decision = ?resolution.decision,
        "Navigation resolved"
    );

    (StatusCode::OK, Json(NavigationResponse::from(resolution))).into_response()
}
