//! HTTP adapters - REST API implementations.
//!
//! Each area has its own dto/handlers/routes module; `router` assembles them
//! behind the auth middleware.

pub mod error;
pub mod middleware;
pub mod navigation;
pub mod profile;
pub mod reveal;
pub mod router;

pub use error::{domain_error_response, ErrorResponse};
pub use router::{api_router, build_app_router, ApiServices};
