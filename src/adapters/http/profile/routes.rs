//! HTTP routes for profile and balance endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{complete_onboarding, get_balance, provision_profile, ProfileHandlers};

/// Creates the profile router, nested under `/api/profile`.
pub fn profile_routes(handlers: ProfileHandlers) -> Router {
    Router::new()
        .route("/provision", post(provision_profile))
        .route("/onboarding", post(complete_onboarding))
        .with_state(handlers)
}

/// Creates the credits router, nested under `/api/credits`.
pub fn credits_routes(handlers: ProfileHandlers) -> Router {
    Router::new()
        .route("/balance", get(get_balance))
        .with_state(handlers)
}
