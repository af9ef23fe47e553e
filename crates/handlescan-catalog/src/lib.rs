//! Handlescan Catalog - Static definitions of the services a handle is checked against.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): one `TargetDefinition` per service
//! - **Loader** ([`loader`]): TOML loading from a file, a directory, or the built-in catalog
//! - **Catalog** ([`catalog`]): ordered, read-only collection with query support
//! - **Errors** ([`error`]): catalog-specific error types
//!
//! # Example
//!
//! ```rust
//! use handlescan_catalog::{TargetCatalog, TargetCategory};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = TargetCatalog::builtin()?;
//! let github = catalog.get("GitHub")?;
//!
//! assert_eq!(github.category, TargetCategory::Development);
//! assert_eq!(github.expected_status, Some(404));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod definition;
pub mod error;
pub mod loader;

// Re-export commonly used types
pub use catalog::TargetCatalog;
pub use definition::{CheckType, HttpMethod, TargetCategory, TargetDefinition, HANDLE_PLACEHOLDER};
pub use error::{CatalogError, Result};
pub use loader::CatalogLoader;
