//! # Cognitive Games Use Case Layer
//!
//! Application-specific business rules.
//! This layer drives the domain's session state machine and keeps the
//! injected `SessionStore` in step with it.
//!
//! - `orchestrator`: `SessionOrchestrator`, the only writer of session state
//! - `persistence`: persisted keys and their codecs

pub mod orchestrator;
pub mod persistence;

pub use cogni_domain;

pub use orchestrator::{OrchestratorError, SessionEvent, SessionOrchestrator, SessionSnapshot};
