//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Identity Ports
//!
//! - `IdentityProvider` - Current session and sign-in/sign-out events
//! - `SessionValidator` - Bearer token validation for the HTTP surface
//! - `DestinationMemory` - Where to send a user after sign-in
//!
//! ## Entitlement Ports
//!
//! - `ProfileRepository` - Profile rows (never the credit balance)
//! - `CreditLedger` - Atomic balance checks, charges and reveal records

mod credit_ledger;
mod destination_memory;
mod identity_provider;
mod profile_repository;
mod session_validator;

pub use credit_ledger::CreditLedger;
pub use destination_memory::DestinationMemory;
pub use identity_provider::IdentityProvider;
pub use profile_repository::ProfileRepository;
pub use session_validator::SessionValidator;
