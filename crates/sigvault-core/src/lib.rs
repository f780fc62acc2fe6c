//! # sigvault-core
//!
//! Core types, configuration, and utilities for sigvault.
//!
//! This crate provides shared functionality used across all sigvault crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the JSON5 config file
//! - **Paths**: Resolution of the `~/.sigvault` layout
//! - **Secrets**: A zeroizing, redacting string wrapper for credential material

pub mod config;
pub mod error;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Result};
pub use secret::SecretString;
