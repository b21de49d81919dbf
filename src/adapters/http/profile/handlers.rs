//! HTTP handlers for profile and balance endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::domain_error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    CompleteOnboardingCommand, CompleteOnboardingHandler, GetBalanceHandler, GetBalanceQuery,
    ProvisionProfileCommand, ProvisionProfileHandler,
};

use super::dto::{OnboardingRequest, ProfileResponse, ProvisionResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ProfileHandlers {
    provision_handler: Arc<ProvisionProfileHandler>,
    onboarding_handler: Arc<CompleteOnboardingHandler>,
    balance_handler: Arc<GetBalanceHandler>,
}

impl ProfileHandlers {
    pub fn new(
        provision_handler: Arc<ProvisionProfileHandler>,
        onboarding_handler: Arc<CompleteOnboardingHandler>,
        balance_handler: Arc<GetBalanceHandler>,
    ) -> Self {
        Self {
            provision_handler,
            onboarding_handler,
            balance_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/profile/provision - Ensure the caller has a profile
pub async fn provision_profile(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let cmd = ProvisionProfileCommand { user_id: user.id };

    match handlers.provision_handler.handle(cmd).await {
        Ok(result) => {
            let status = if result.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let body = ProvisionResponse {
                created: result.created,
                profile: result.profile.into(),
            };
            (status, Json(body)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/profile/onboarding - Save business details and finish onboarding
pub async fn complete_onboarding(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<OnboardingRequest>,
) -> Response {
    let cmd = CompleteOnboardingCommand {
        user_id: user.id,
        company_name: req.company_name,
        service_area: req.service_area,
    };

    match handlers.onboarding_handler.handle(cmd).await {
        Ok(profile) => (StatusCode::OK, Json(ProfileResponse::from(profile))).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/credits/balance - Current balance with the low-balance flag
pub async fn get_balance(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = GetBalanceQuery { user_id: user.id };

    match handlers.balance_handler.handle(query).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => domain_error_response(e),
    }
}
