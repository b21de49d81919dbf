//! Navigation handlers - the live route guard.

mod guard;

pub use guard::NavigationGuard;
