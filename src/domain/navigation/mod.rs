//! Navigation domain module.
//!
//! The route guard: a pure decision over session state, profile state,
//! loading time and the requested path.

mod decision;
mod resolver;
mod routes;
mod timer;

pub use decision::{GuardState, NavigationDecision, Resolution};
pub use resolver::{NavigationResolver, DEFAULT_LOADING_TIMEOUT};
pub use routes::RouteMap;
pub use timer::LoadingTimer;
