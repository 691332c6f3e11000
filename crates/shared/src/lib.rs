//! # Cognitive Games Shared
//!
//! Common error and configuration types used by the use case, adapter and
//! app crates. The domain crate does not depend on this one.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
