//! Catalog loading from TOML files.
//!
//! A catalog file is an array of `[[target]]` tables. A directory is loaded
//! by reading every `*.toml` file in file-name order and concatenating the
//! targets, so the resulting order is stable across runs.

use crate::{
    definition::TargetDefinition,
    error::{CatalogError, Result},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Catalog compiled into the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "target")]
    targets: Vec<TargetDefinition>,
}

/// Loader for target definitions from a TOML file or directory.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: PathBuf,
}

impl CatalogLoader {
    /// Create a loader for the given file or directory.
    ///
    /// # Errors
    /// Returns error if the path doesn't exist.
    pub fn new(source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();

        if !source.exists() {
            return Err(CatalogError::PathNotFound {
                path: source.display().to_string(),
            });
        }

        Ok(Self { source })
    }

    /// The file or directory this loader reads.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Load and validate every target from the source, in order.
    ///
    /// Any unreadable file, parse error or invalid definition fails the
    /// whole load: a defective catalog is a startup error.
    pub fn load_all(&self) -> Result<Vec<TargetDefinition>> {
        let targets = if self.source.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.source)? {
                let path = entry?.path();
                if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml") {
                    files.push(path);
                }
            }
            files.sort();

            let mut targets = Vec::new();
            for path in &files {
                targets.extend(Self::load_file(path)?);
            }
            targets
        } else {
            Self::load_file(&self.source)?
        };

        info!(
            count = targets.len(),
            source = %self.source.display(),
            "loaded target catalog"
        );

        Ok(targets)
    }

    /// Parse targets from TOML text. `origin` labels errors.
    pub fn parse_str(contents: &str, origin: &str) -> Result<Vec<TargetDefinition>> {
        let file: CatalogFile = toml::from_str(contents).map_err(|e| CatalogError::ParseError {
            path: origin.to_string(),
            source: e,
        })?;

        for target in &file.targets {
            target.validate()?;
        }

        debug!(count = file.targets.len(), origin, "parsed catalog source");
        Ok(file.targets)
    }

    /// Parse the built-in catalog.
    pub fn builtin() -> Result<Vec<TargetDefinition>> {
        Self::parse_str(BUILTIN_CATALOG, "<builtin>")
    }

    fn load_file(path: &Path) -> Result<Vec<TargetDefinition>> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Self::parse_str(&contents, &path.display().to_string())
    }
}
