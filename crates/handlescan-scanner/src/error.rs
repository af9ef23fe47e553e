use thiserror::Error;

/// Errors that fail a whole check session.
///
/// Per-target failures never surface here; they become `unknown` outcomes.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The catalog, or the filter applied to it, selected no targets
    #[error("no targets selected for this check")]
    NoTargets,

    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_targets_display() {
        assert_eq!(ScanError::NoTargets.to_string(), "no targets selected for this check");
    }
}
