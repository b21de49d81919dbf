//! HTTP adapter for reveal endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BulkRevealRequest, BulkRevealResponse, RevealCheckResponse, RevealParams,
    RevealRecordResponse, RevealResponse,
};
pub use handlers::RevealHandlers;
pub use routes::reveal_routes;
