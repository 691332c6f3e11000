//! Persistence Adapters - SessionStore implementations
//!
//! These implement the `SessionStore` port from cogni-domain.
//!
//! - `in_memory`: shared map, used by tests and the demo
//! - `file`: one JSON object on disk, survives restarts
//! - `unavailable`: every call fails; the session runs in memory only

pub mod file;
pub mod in_memory;
pub mod unavailable;
