//! In-memory adapters for tests and local development.
//!
//! - `InMemoryLedgerStore` - Profiles, balances and reveals behind one lock
//! - `InMemoryDestinationMemory` - Single-slot intended destination

mod destination_memory;
mod ledger_store;

pub use destination_memory::InMemoryDestinationMemory;
pub use ledger_store::InMemoryLedgerStore;
