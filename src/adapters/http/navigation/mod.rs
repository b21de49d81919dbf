//! HTTP adapter for the route guard.

mod dto;
mod handlers;
mod routes;

pub use dto::{NavigationParams, NavigationResponse};
pub use handlers::NavigationHandlers;
pub use routes::navigation_routes;
