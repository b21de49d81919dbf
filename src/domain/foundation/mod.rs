//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types and the error
//! vocabulary shared by the session, profile, navigation and ledger modules.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ListingId, UserId};
pub use timestamp::Timestamp;
