//! Apptrack Core - shared foundation for the appointment scheduling service
//!
//! This crate defines the domain types, error handling, configuration, and
//! logging setup used by the rest of the workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external crates
pub use tracing;
