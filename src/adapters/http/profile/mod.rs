//! HTTP adapter for profile and credit balance endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{OnboardingRequest, ProfileResponse, ProvisionResponse};
pub use handlers::ProfileHandlers;
pub use routes::{credits_routes, profile_routes};
