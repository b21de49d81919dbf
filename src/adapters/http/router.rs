//! Application router assembly.
//!
//! `build_app_router` is shared by the binary and the integration tests so
//! both run the same middleware stack.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::{
    BalanceCache, CompleteOnboardingHandler, GetBalanceHandler, ProvisionProfileHandler,
    RevealService,
};
use crate::config::{CreditsConfig, NavigationConfig, ServerConfig, ValidationError};
use crate::ports::{CreditLedger, ProfileRepository};

use super::middleware::{auth_middleware, AuthState};
use super::navigation::{navigation_routes, NavigationHandlers};
use super::profile::{credits_routes, profile_routes, ProfileHandlers};
use super::reveal::{reveal_routes, RevealHandlers};

/// Everything the API routes need.
#[derive(Clone)]
pub struct ApiServices {
    pub validator: AuthState,
    pub reveals: RevealHandlers,
    pub navigation: NavigationHandlers,
    pub profiles: ProfileHandlers,
}

impl ApiServices {
    /// Wires handlers over the given ports using the navigation and credit
    /// settings.
    pub fn build(
        validator: AuthState,
        profiles: Arc<dyn ProfileRepository>,
        ledger: Arc<dyn CreditLedger>,
        navigation: &NavigationConfig,
        credits: &CreditsConfig,
    ) -> Result<Self, ValidationError> {
        let balance_cache = Arc::new(BalanceCache::new(ledger.clone()));
        // Per-user caches would grow with every caller, so the server reads
        // reveal state from the ledger and only caches watched balances.
        let service = RevealService::new(ledger, credits.pricing()?, balance_cache.clone())
            .with_max_bulk_reveal(credits.max_bulk_reveal);

        Ok(Self {
            validator,
            reveals: RevealHandlers::new(Arc::new(service)),
            navigation: NavigationHandlers::new(navigation.resolver(), profiles.clone()),
            profiles: ProfileHandlers::new(
                Arc::new(ProvisionProfileHandler::new(
                    profiles.clone(),
                    credits.starting_credits,
                )),
                Arc::new(CompleteOnboardingHandler::new(profiles)),
                Arc::new(GetBalanceHandler::new(
                    balance_cache,
                    credits.low_balance_threshold,
                )),
            ),
        })
    }
}

/// `/api` routes behind the auth middleware, without transport layers.
pub fn api_router(services: ApiServices) -> Router {
    Router::new()
        .nest("/api/navigation", navigation_routes(services.navigation))
        .nest("/api/reveals", reveal_routes(services.reveals))
        .nest("/api/profile", profile_routes(services.profiles.clone()))
        .nest("/api/credits", credits_routes(services.profiles))
        .layer(middleware::from_fn_with_state(
            services.validator,
            auth_middleware,
        ))
}

/// Full router: health check, API routes and the middleware stack.
///
/// Layers apply bottom-up: request id, tracing, id propagation, timeout, CORS.
pub fn build_app_router(services: ApiServices, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(api_router(services))
        .layer(build_cors_layer(config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
