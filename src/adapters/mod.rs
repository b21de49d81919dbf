//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Bearer token validation and test identity providers
//! - `http` - axum routes, middleware and error mapping
//! - `memory` - In-memory ledger and destination memory
//! - `postgres` - sqlx-backed profile repository and credit ledger

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
