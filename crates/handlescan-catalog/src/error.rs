//! Error types for the target catalog.

use thiserror::Error;

/// Errors that can occur while loading or querying the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Target not present in the catalog
    #[error("target not found: {name}")]
    NotFound {
        /// The target name that was looked up
        name: String,
    },

    /// Failed to read a catalog file
    #[error("failed to load catalog from {path}: {source}")]
    LoadError {
        /// Path to the catalog file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse catalog TOML
    #[error("failed to parse catalog TOML in {path}: {source}")]
    ParseError {
        /// Path (or origin label) of the catalog source
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// A target definition failed validation
    #[error("invalid target definition for {target}: {reason}")]
    ValidationError {
        /// Target name being validated
        target: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Two targets share a name
    #[error("duplicate target name: {name}")]
    DuplicateTarget {
        /// The repeated name
        name: String,
    },

    /// Catalog path does not exist
    #[error("catalog path not found at {path}")]
    PathNotFound {
        /// Expected file or directory path
        path: String,
    },

    /// I/O error while accessing catalog files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
