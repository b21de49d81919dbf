//! HTTP routes for navigation endpoints.

use axum::{routing::get, Router};

use super::handlers::{resolve_navigation, NavigationHandlers};

/// Creates the navigation router, nested under `/api/navigation`.
pub fn navigation_routes(handlers: NavigationHandlers) -> Router {
    Router::new()
        .route("/", get(resolve_navigation))
        .with_state(handlers)
}
