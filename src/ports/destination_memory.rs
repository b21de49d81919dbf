//! Intended-destination memory port.
//!
//! A single slot holding the protected page a signed-out visitor tried to
//! open, so the identity provider can send them back after sign-in.

/// Single-slot path memory. Every `remember` overwrites the previous value.
pub trait DestinationMemory: Send + Sync {
    fn remember(&self, path: &str);

    /// Read without clearing.
    fn peek(&self) -> Option<String>;

    /// Read and clear.
    fn take(&self) -> Option<String>;
}
