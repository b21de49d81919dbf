//! HTTP handlers for reveal endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{RevealListingCommand, RevealListingsCommand, RevealService};
use crate::domain::foundation::ListingId;

use super::dto::{
    BulkRevealRequest, BulkRevealResponse, RevealCheckResponse, RevealParams,
    RevealRecordResponse, RevealResponse,
};

#[derive(Clone)]
pub struct RevealHandlers {
    service: Arc<RevealService>,
}

impl RevealHandlers {
    pub fn new(service: Arc<RevealService>) -> Self {
        Self { service }
    }
}

/// POST /api/reveals/:listing_id - Reveal one listing, charging if new
pub async fn reveal_listing(
    State(handlers): State<RevealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(listing_id): Path<Uuid>,
    Query(params): Query<RevealParams>,
) -> Response {
    let cmd = RevealListingCommand {
        user_id: user.id,
        listing_id: ListingId::from_uuid(listing_id),
        listing_kind: params.kind,
        cost_override: None,
    };

    match handlers.service.reveal(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(RevealResponse::from(outcome))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/reveals/bulk - Reveal a batch of listings in one charge
pub async fn reveal_listings(
    State(handlers): State<RevealHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<BulkRevealRequest>,
) -> Response {
    let cmd = RevealListingsCommand {
        user_id: user.id,
        listing_ids: req.listing_ids(),
        listing_kind: req.listing_kind,
        cost_override: None,
    };

    match handlers.service.reveal_many(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(BulkRevealResponse::from(outcome))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/reveals - Reveals owned by the caller, oldest first
pub async fn list_reveals(
    State(handlers): State<RevealHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.service.revealed_listings(&user.id).await {
        Ok(records) => {
            let body: Vec<RevealRecordResponse> =
                records.into_iter().map(RevealRecordResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/reveals/:listing_id - Whether the caller owns a listing
pub async fn check_reveal(
    State(handlers): State<RevealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(listing_id): Path<Uuid>,
) -> Response {
    let listing_id = ListingId::from_uuid(listing_id);
    match handlers.service.is_revealed(&user.id, listing_id).await {
        Ok(revealed) => (
            StatusCode::OK,
            Json(RevealCheckResponse {
                listing_id,
                revealed,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
