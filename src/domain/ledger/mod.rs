//! Ledger domain module.
//!
//! Credit accounting types shared by every `CreditLedger` adapter.
//!
//! # Invariants
//!
//! - A balance is never negative (`u32`, and `Profile::debit` refuses overdraw)
//! - At most one `RevealRecord` per (listing, user); re-revealing is free
//! - Bulk charges are all-or-nothing
//! - Unlimited profiles bypass affordability and are never decremented

mod balance;
mod cost;
mod outcome;
mod plan;
mod reveal;

pub use balance::Balance;
pub use cost::{CreditCost, MAX_CREDIT_COST};
pub use outcome::{BulkChargeOutcome, ChargeOutcome, ChargeReason};
pub use plan::BulkChargePlan;
pub use reveal::RevealRecord;
