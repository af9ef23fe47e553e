//! Handlescan Core - Foundation crate for the Handlescan handle checker.
//!
//! This crate provides the shared types, error handling and configuration
//! that the catalog, browser, scanner and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes and enums (`Handle`, `ProbeStatus`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use handlescan_core::{AppConfig, Handle, ProbeStatus};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.probing.max_concurrent_probes, 5);
//!
//! let handle = Handle::new("alice123")?;
//! assert_eq!(handle.as_str(), "alice123");
//! assert!(ProbeStatus::Taken.is_conclusive());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, CatalogConfig, DispatchMode, ProbingConfig, SessionConfig,
};
pub use error::{ConfigError, ConfigResult, HandlescanError, Result};
pub use types::{Handle, ProbeStatus, Timestamp};
