//! # Cognitive Games Adapter Layer
//!
//! Implementations of the domain's ports (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `repository/` - `SessionStore` implementations (memory, JSON file, unavailable)

pub mod repository;

pub use repository::file::FileSessionStore;
pub use repository::in_memory::InMemorySessionStore;
pub use repository::unavailable::UnavailableStore;
