//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresProfileRepository` - Profile lookup, provisioning and onboarding
//! - `PostgresCreditLedger` - Transactional credit charges and reveal records

mod credit_ledger;
mod profile_repository;

pub use credit_ledger::PostgresCreditLedger;
pub use profile_repository::PostgresProfileRepository;

use crate::domain::foundation::DomainError;

/// Schema migrations embedded from `./migrations`.
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Logs a driver error and converts it to a `DatabaseError`.
///
/// The driver message stays in the log; callers only see the action.
pub(crate) fn database_error(action: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, action, "Database operation failed");
    DomainError::database(format!("Failed to {}", action))
}
