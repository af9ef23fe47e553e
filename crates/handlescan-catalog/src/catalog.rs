//! Ordered, read-only target catalog with query support.

use crate::{
    definition::{TargetCategory, TargetDefinition},
    error::{CatalogError, Result},
    loader::CatalogLoader,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

/// Ordered collection of validated target definitions.
///
/// The catalog is built once at process start and never mutated. Targets
/// are held behind `Arc` so probes running on other tasks can share them
/// without copying. Iteration order is catalog order.
#[derive(Debug, Clone, Default)]
pub struct TargetCatalog {
    targets: Vec<Arc<TargetDefinition>>,
}

impl TargetCatalog {
    /// Build a catalog, validating every definition and rejecting duplicate names.
    pub fn new(definitions: Vec<TargetDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(definitions.len());

        for definition in definitions {
            definition.validate()?;

            if !seen.insert(definition.name.to_lowercase()) {
                return Err(CatalogError::DuplicateTarget {
                    name: definition.name,
                });
            }

            targets.push(Arc::new(definition));
        }

        Ok(Self { targets })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let catalog = Self::new(CatalogLoader::builtin()?)?;
        info!(count = catalog.len(), "using built-in target catalog");
        Ok(catalog)
    }

    /// Build a catalog from everything the loader yields.
    pub fn load_from(loader: &CatalogLoader) -> Result<Self> {
        Self::new(loader.load_all()?)
    }

    /// Look up a target by name (case-insensitive).
    pub fn get(&self, name: &str) -> Result<Arc<TargetDefinition>> {
        self.targets
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }

    /// Whether a target with this name exists (case-insensitive).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.targets.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// All targets in catalog order.
    #[must_use]
    pub fn targets(&self) -> &[Arc<TargetDefinition>] {
        &self.targets
    }

    /// Iterate targets in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TargetDefinition>> {
        self.targets.iter()
    }

    /// Targets in one category, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: TargetCategory) -> Vec<Arc<TargetDefinition>> {
        self.targets
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect()
    }

    /// Number of targets per category.
    #[must_use]
    pub fn count_by_category(&self) -> HashMap<TargetCategory, usize> {
        let mut counts = HashMap::new();
        for target in &self.targets {
            *counts.entry(target.category).or_insert(0) += 1;
        }
        counts
    }

    /// Number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the catalog has no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
