//! HTTP integration tests.
//!
//! Drives the full router (auth middleware, handlers, error mapping) over the
//! in-memory ledger with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use leadgate::adapters::auth::MockSessionValidator;
use leadgate::adapters::http::{build_app_router, ApiServices};
use leadgate::adapters::memory::InMemoryLedgerStore;
use leadgate::config::{CreditsConfig, NavigationConfig, ServerConfig};
use leadgate::domain::foundation::UserId;
use leadgate::domain::profile::Profile;

const TOKEN: &str = "agent-token";
const USER: &str = "agent-1";

// ════════════════════════════════════════════════════════════════════════════
// Test Infrastructure
// ════════════════════════════════════════════════════════════════════════════

struct TestApp {
    router: Router,
    store: Arc<InMemoryLedgerStore>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_credits(CreditsConfig {
            listing_kind_costs: Some("probate=3".to_string()),
            starting_credits: 2,
            ..Default::default()
        })
    }

    fn with_credits(credits: CreditsConfig) -> Self {
        let store = Arc::new(InMemoryLedgerStore::new());
        let validator = Arc::new(MockSessionValidator::new().with_test_user(TOKEN, USER));
        let services = ApiServices::build(
            validator,
            store.clone(),
            store.clone(),
            &NavigationConfig::default(),
            &credits,
        )
        .unwrap();
        Self {
            router: build_app_router(services, &ServerConfig::default()),
            store,
        }
    }

    async fn seed(&self, credits: u32, onboarded: bool) {
        let mut profile = Profile::provision(user(), credits);
        profile.onboarding_complete = onboarded;
        self.store.seed(profile).await;
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, Some(TOKEN), None).await
    }

    async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send("POST", uri, Some(TOKEN), body).await
    }
}

fn user() -> UserId {
    UserId::new(USER).unwrap()
}

// ════════════════════════════════════════════════════════════════════════════
// Authentication
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_check_needs_no_token() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_endpoints_require_token() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/credits/balance", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    let (status, _) = app
        .send("GET", "/api/credits/balance", Some("forged"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ════════════════════════════════════════════════════════════════════════════
// Reveals
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn reveal_charges_once_then_reports_owned() {
    let app = TestApp::new();
    app.seed(3, true).await;
    let listing = Uuid::new_v4();

    let (status, body) = app.post(&format!("/api/reveals/{}", listing), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "revealed");
    assert_eq!(body["credits_charged"], 1);
    assert_eq!(body["balance"]["credits_remaining"], 2);

    let (status, body) = app.post(&format!("/api/reveals/{}", listing), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already_owned");
    assert_eq!(body["credits_charged"], 0);

    let (_, body) = app.get(&format!("/api/reveals/{}", listing)).await;
    assert_eq!(body["revealed"], true);

    let (_, body) = app.get("/api/credits/balance").await;
    assert_eq!(body["credits_remaining"], 2);
    assert_eq!(app.store.reveal_count(&user()).await, 1);
}

#[tokio::test]
async fn insufficient_credits_returns_402_with_amounts() {
    let app = TestApp::new();
    app.seed(1, true).await;

    let (status, body) = app
        .post(&format!("/api/reveals/{}?kind=probate", Uuid::new_v4()), None)
        .await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error_code"], "INSUFFICIENT_CREDITS");
    assert_eq!(body["details"]["required"], 3);
    assert_eq!(body["details"]["available"], 1);
    assert_eq!(app.store.reveal_count(&user()).await, 0);
}

#[tokio::test]
async fn reveal_without_profile_returns_404() {
    let app = TestApp::new();

    let (status, body) = app
        .post(&format!("/api/reveals/{}", Uuid::new_v4()), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "PROFILE_NOT_FOUND");
}

#[tokio::test]
async fn bulk_reveal_skips_owned_listings() {
    let app = TestApp::new();
    app.seed(5, true).await;
    let owned = Uuid::new_v4();
    app.post(&format!("/api/reveals/{}", owned), None).await;

    let fresh = [Uuid::new_v4(), Uuid::new_v4()];
    let (status, body) = app
        .post(
            "/api/reveals/bulk",
            Some(json!({ "listing_ids": [owned, fresh[0], fresh[1], fresh[0]] })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_cost"], 2);
    assert_eq!(body["unlocked_count"], 3);
    assert_eq!(body["already_owned"], json!([owned]));
    assert_eq!(body["balance"]["credits_remaining"], 2);

    let (_, body) = app.get("/api/reveals").await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn bulk_reveal_is_all_or_nothing() {
    let app = TestApp::new();
    app.seed(1, true).await;

    let (status, body) = app
        .post(
            "/api/reveals/bulk",
            Some(json!({ "listing_ids": [Uuid::new_v4(), Uuid::new_v4()] })),
        )
        .await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["details"]["required"], 2);
    assert_eq!(app.store.reveal_count(&user()).await, 0);
}

#[tokio::test]
async fn empty_bulk_request_is_a_validation_error() {
    let app = TestApp::new();
    app.seed(1, true).await;

    let (status, body) = app
        .post("/api/reveals/bulk", Some(json!({ "listing_ids": [] })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn storage_outage_returns_retryable_500() {
    let app = TestApp::new();
    app.seed(3, true).await;
    app.store.set_unavailable(true);

    let (status, body) = app
        .post(&format!("/api/reveals/{}", Uuid::new_v4()), None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "INTERNAL_ERROR");
}

// ════════════════════════════════════════════════════════════════════════════
// Profile
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn provision_is_idempotent() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/profile/provision", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(body["profile"]["credits_remaining"], 2);

    let (status, body) = app.post("/api/profile/provision", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);
}

#[tokio::test]
async fn onboarding_validates_and_completes() {
    let app = TestApp::new();
    app.seed(0, false).await;

    let (status, _) = app
        .post("/api/profile/onboarding", Some(json!({ "company_name": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/profile/onboarding",
            Some(json!({ "company_name": "Acme Lettings", "service_area": "Leeds" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["onboarding_complete"], true);
    assert_eq!(body["company_name"], "Acme Lettings");
}

#[tokio::test]
async fn low_balance_flag_follows_threshold() {
    let app = TestApp::new();
    app.seed(5, true).await;

    let (_, body) = app.get("/api/credits/balance").await;
    assert_eq!(body["low_balance"], true);

    app.seed(6, true).await;
    let (_, body) = app.get("/api/credits/balance").await;
    assert_eq!(body["low_balance"], false);
}

// ════════════════════════════════════════════════════════════════════════════
// Navigation
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn anonymous_visit_to_protected_path_redirects_to_login() {
    let app = TestApp::new();

    let (status, body) = app
        .send("GET", "/api/navigation?path=/leads/42", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], json!({ "kind": "redirect_to", "target": "/login" }));
    assert_eq!(body["intended_destination"], "/leads/42");
}

#[tokio::test]
async fn signed_in_user_without_profile_goes_to_recovery() {
    let app = TestApp::new();

    let (_, body) = app.get("/api/navigation?path=/dashboard").await;

    assert_eq!(body["decision"]["target"], "/auth/recovery");
    assert!(body.get("intended_destination").is_none());
}

#[tokio::test]
async fn onboarding_state_drives_navigation() {
    let app = TestApp::new();
    app.seed(0, false).await;

    let (_, body) = app.get("/api/navigation?path=/leads").await;
    assert_eq!(body["decision"]["target"], "/onboarding");

    app.seed(0, true).await;
    let (_, body) = app.get("/api/navigation?path=/onboarding").await;
    assert_eq!(body["decision"]["target"], "/dashboard");

    let (_, body) = app.get("/api/navigation?path=/leads").await;
    assert_eq!(body["decision"], json!({ "kind": "render" }));
}
