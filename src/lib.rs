//! Leadgate - session gating and metered credit reveals for a leads marketplace.
//!
//! The route guard decides where a visitor may go while session and profile
//! state load asynchronously. The credit ledger charges for listing reveals
//! at most once per listing and never drives a balance negative.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
