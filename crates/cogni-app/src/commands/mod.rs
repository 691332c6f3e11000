//! CLI Commands

pub mod demo;
pub mod play;
pub mod reset;
pub mod status;

pub use demo::DemoCommand;
pub use play::PlayCommand;
pub use reset::ResetCommand;
pub use status::StatusCommand;
