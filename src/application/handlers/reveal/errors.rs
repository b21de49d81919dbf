//! Reveal-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InsufficientCredits | 402 |
//! | TooManyListings | 400 |
//! | ValidationFailed | 400 |
//! | ProfileNotFound | 404 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors returned by `RevealService`.
///
/// `AlreadyOwned` is not here: re-revealing is a successful no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// The balance cannot cover the reveal. Also returned when a concurrent
    /// charge won the race for the last credits.
    InsufficientCredits { required: u64, available: u32 },

    /// Bulk request above the configured ceiling.
    TooManyListings { requested: usize, max: usize },

    /// The user has no profile yet.
    ProfileNotFound,

    ValidationFailed { field: String, message: String },

    /// Storage or network failure.
    Infrastructure(String),
}

impl RevealError {
    pub fn insufficient_credits(required: u64, available: u32) -> Self {
        RevealError::InsufficientCredits {
            required,
            available,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RevealError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        RevealError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RevealError::InsufficientCredits { .. } => ErrorCode::InsufficientCredits,
            RevealError::TooManyListings { .. } | RevealError::ValidationFailed { .. } => {
                ErrorCode::ValidationFailed
            }
            RevealError::ProfileNotFound => ErrorCode::ProfileNotFound,
            RevealError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RevealError::InsufficientCredits {
                required,
                available,
            } => format!(
                "Not enough credits: {} required, {} available",
                required, available
            ),
            RevealError::TooManyListings { requested, max } => format!(
                "Cannot reveal {} listings at once (maximum {})",
                requested, max
            ),
            RevealError::ProfileNotFound => "Profile has not been set up yet".to_string(),
            RevealError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            RevealError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Infrastructure failures may succeed on retry; nothing else will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RevealError::Infrastructure(_))
    }
}

impl std::fmt::Display for RevealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RevealError {}

impl From<ValidationError> for RevealError {
    fn from(err: ValidationError) -> Self {
        RevealError::validation(err.field(), err.to_string())
    }
}

impl From<DomainError> for RevealError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ProfileNotFound => RevealError::ProfileNotFound,
            ErrorCode::ValidationFailed => RevealError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => RevealError::Infrastructure(err.to_string()),
        }
    }
}

impl From<RevealError> for DomainError {
    fn from(err: RevealError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
