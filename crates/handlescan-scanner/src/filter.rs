use handlescan_catalog::{TargetCatalog, TargetCategory, TargetDefinition};
use std::sync::Arc;

/// Which targets a check covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetFilter {
    /// Every target in the catalog
    #[default]
    All,
    /// Targets in one category
    Category(TargetCategory),
    /// Targets named explicitly (case-insensitive)
    Specific(Vec<String>),
}

impl TargetFilter {
    pub fn matches(&self, target: &TargetDefinition) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => target.category == *category,
            Self::Specific(names) => names.iter().any(|n| n.eq_ignore_ascii_case(&target.name)),
        }
    }

    /// Matching targets in catalog order.
    pub fn select(&self, catalog: &TargetCatalog) -> Vec<Arc<TargetDefinition>> {
        catalog.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}
