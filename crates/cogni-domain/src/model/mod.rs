//! Domain Models - The vocabulary of the assessment
//!
//! These types represent the "Ubiquitous Language" of the games.
//! Every name here should match how we talk about the system.

pub mod countdown;
pub mod game;
pub mod maze;
pub mod metrics;
pub mod session;
pub mod user;
