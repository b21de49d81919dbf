//! Session domain module.
//!
//! Authentication identity as seen by the route guard. The identity
//! provider itself is external; see `ports::IdentityProvider`.

mod events;
#[allow(clippy::module_inception)]
mod session;

pub use events::AuthEvent;
pub use session::{Session, SessionSnapshot};
