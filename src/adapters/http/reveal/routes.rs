//! HTTP routes for reveal endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{check_reveal, list_reveals, reveal_listing, reveal_listings, RevealHandlers};

/// Creates the reveal router, nested under `/api/reveals`.
pub fn reveal_routes(handlers: RevealHandlers) -> Router {
    Router::new()
        .route("/", get(list_reveals))
        .route("/bulk", post(reveal_listings))
        .route("/:listing_id", get(check_reveal).post(reveal_listing))
        .with_state(handlers)
}
