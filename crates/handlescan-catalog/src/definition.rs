//! Target definition types.
//!
//! A target describes one external service: where a profile for a handle
//! would live and how to read the service's response.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted with the handle in a URL template.
pub const HANDLE_PLACEHOLDER: &str = "{handle}";

/// One external service definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Human-readable service name, unique within a catalog
    pub name: String,

    /// Profile URL with exactly one `{handle}` placeholder
    #[serde(alias = "url")]
    pub url_template: String,

    /// HTTP method used by the probe
    #[serde(default)]
    pub method: HttpMethod,

    /// Status code that settles the verdict for this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<u16>,

    /// When true, `expected_status` means "available" rather than "taken"
    #[serde(default, alias = "invert_result")]
    pub invert_expected_status: bool,

    /// Logo reference, passed through to results untouched
    #[serde(default)]
    pub logo: String,

    /// Service category, passed through to results untouched
    #[serde(default)]
    pub category: TargetCategory,

    /// Which prober handles this target
    #[serde(default)]
    pub check_type: CheckType,
}

impl TargetDefinition {
    /// Create an HTTP target with default interpretation rules.
    #[must_use]
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            method: HttpMethod::default(),
            expected_status: None,
            invert_expected_status: false,
            logo: String::new(),
            category: TargetCategory::default(),
            check_type: CheckType::default(),
        }
    }

    /// Set the expected status code and whether it means "available".
    #[must_use]
    pub fn with_expected_status(mut self, status: u16, invert: bool) -> Self {
        self.expected_status = Some(status);
        self.invert_expected_status = invert;
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: TargetCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the prober used for this target.
    #[must_use]
    pub fn with_check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = check_type;
        self
    }

    /// Validate the definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("target name cannot be empty"));
        }

        let placeholders = self.url_template.matches(HANDLE_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(self.invalid(format!(
                "url_template must contain exactly one {HANDLE_PLACEHOLDER} placeholder, found {placeholders}"
            )));
        }

        let sample = self.url_template.replace(HANDLE_PLACEHOLDER, "handle");
        let parsed = url::Url::parse(&sample)
            .map_err(|e| self.invalid(format!("url_template is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(self.invalid(format!(
                "url_template must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if let Some(status) = self.expected_status {
            if !(100..=599).contains(&status) {
                return Err(self.invalid(format!("expected_status must be 100-599, got {status}")));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::ValidationError {
            target: self.name.clone(),
            reason: reason.into(),
        }
    }
}

/// HTTP methods a probe may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Fetch the full page
    #[default]
    Get,
    /// Fetch headers only
    Head,
}

/// Which prober handles a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    /// Plain HTTP request, classified from status code and body
    #[default]
    Http,
    /// Rendered in a headless browser, classified from the final page
    Browser,
}

/// Service categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetCategory {
    /// Code hosting and developer communities
    Development,
    /// Social networks
    Social,
    /// Professional networks
    Professional,
    /// Blogging and publishing
    Content,
    /// Design portfolios
    Creative,
    /// Music streaming
    Music,
    /// Other/uncategorized
    #[default]
    Other,
}

impl TargetCategory {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Social => "Social",
            Self::Professional => "Professional",
            Self::Content => "Content",
            Self::Creative => "Creative",
            Self::Music => "Music",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for TargetCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "social" => Ok(Self::Social),
            "professional" => Ok(Self::Professional),
            "content" => Ok(Self::Content),
            "creative" => Ok(Self::Creative),
            "music" => Ok(Self::Music),
            "other" => Ok(Self::Other),
            other => Err(CatalogError::ValidationError {
                target: String::new(),
                reason: format!("unknown category '{other}'"),
            }),
        }
    }
}
