//! Authentication adapters.
//!
//! - `jwt` - HS256 shared-secret `SessionValidator`
//! - `mock` - Test implementations of `SessionValidator` and `IdentityProvider`

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::{MockIdentityProvider, MockSessionValidator};
