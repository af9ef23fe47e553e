use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::NavigationError("net::ERR_NAME_NOT_RESOLVED".to_string());
        assert_eq!(err.to_string(), "navigation failed: net::ERR_NAME_NOT_RESOLVED");
    }

    #[test]
    fn test_timeout_error() {
        let err = BrowserError::Timeout("https://example.com/alice".to_string());
        assert!(err.to_string().contains("example.com/alice"));
    }
}
