//! # Shared
//!
//! Configuration and error types used by the controller and the CLI.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
