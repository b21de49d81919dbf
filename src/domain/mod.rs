//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `session` - Authenticated identity snapshot and provider events
//! - `profile` - Entitlement and business-identity record
//! - `ledger` - Credit costs, balances, reveal records and charge outcomes
//! - `navigation` - Route guard resolver and loading timer

pub mod foundation;
pub mod ledger;
pub mod navigation;
pub mod profile;
pub mod session;
