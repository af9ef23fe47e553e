//! Shared types used across Handlescan.

use crate::error::HandlescanError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Minimum handle length accepted at the entry point.
pub const HANDLE_MIN_LEN: usize = 2;

/// Maximum handle length accepted at the entry point.
pub const HANDLE_MAX_LEN: usize = 30;

/// The identifier being checked for registration on external services.
///
/// A `Handle` is always non-empty, 2-30 characters long and consists only of
/// ASCII letters, digits, underscores and hyphens. Constructing one is the
/// validation step; code that receives a `Handle` never re-validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Create a new `Handle` from the raw input. Surrounding whitespace is
    /// rejected, not trimmed.
    ///
    /// # Errors
    /// Returns a validation error if the handle is empty, outside the
    /// allowed length, or contains characters other than `[A-Za-z0-9_-]`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, HandlescanError> {
        let handle = raw.as_ref();
        Self::validate(handle)?;
        Ok(Self(handle.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(handle: &str) -> Result<(), HandlescanError> {
        static HANDLE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = HANDLE_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

        if handle.is_empty() {
            return Err(HandlescanError::Validation("handle is required".to_string()));
        }

        let len = handle.chars().count();
        if !(HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&len) {
            return Err(HandlescanError::Validation(format!(
                "handle must be between {HANDLE_MIN_LEN} and {HANDLE_MAX_LEN} characters, got {len}"
            )));
        }

        if regex.is_match(handle) {
            Ok(())
        } else {
            Err(HandlescanError::Validation(
                "handle can only contain letters, numbers, underscores, and hyphens".to_string(),
            ))
        }
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Availability verdict for one handle on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// No account with this handle appears to exist
    Available,
    /// An account with this handle appears to exist
    Taken,
    /// No confident signal either way
    Unknown,
}

impl ProbeStatus {
    /// Whether this verdict settles a probe without further attempts.
    #[must_use]
    pub fn is_conclusive(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Lowercase label used in reports and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Taken => "taken",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, HandlescanError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| HandlescanError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_valid() {
        for raw in ["ab", "alice123", "the_real-one", "A1", &"x".repeat(30)] {
            assert!(Handle::new(raw).is_ok(), "should accept: {raw}");
        }
    }

    #[test]
    fn test_handle_invalid() {
        let too_long = "a".repeat(31);
        let invalid = vec!["", "   ", "a", "has space", "dots.not.allowed", "emoji😀", too_long.as_str()];

        for raw in invalid {
            assert!(Handle::new(raw).is_err(), "should reject: {raw}");
        }
    }

    #[test]
    fn test_handle_rejects_surrounding_whitespace() {
        for raw in [" alice123 ", "alice123\n", "\talice123"] {
            assert!(Handle::new(raw).is_err(), "should reject: {raw:?}");
        }
    }

    #[test]
    fn test_handle_deserialize_validates() {
        let ok: Handle = serde_json::from_str("\"alice123\"").expect("deserialize handle");
        assert_eq!(ok.to_string(), "alice123");
        assert!(serde_json::from_str::<Handle>("\"a b\"").is_err());
    }

    #[test]
    fn test_probe_status_serialization() {
        let json = serde_json::to_string(&ProbeStatus::Available).expect("serialize status");
        assert_eq!(json, "\"available\"");

        let parsed: ProbeStatus = serde_json::from_str("\"taken\"").expect("deserialize status");
        assert_eq!(parsed, ProbeStatus::Taken);
    }

    #[test]
    fn test_probe_status_conclusive() {
        assert!(ProbeStatus::Available.is_conclusive());
        assert!(ProbeStatus::Taken.is_conclusive());
        assert!(!ProbeStatus::Unknown.is_conclusive());
        assert_eq!(ProbeStatus::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let ts = Timestamp::now();
        let parsed = Timestamp::from_rfc3339(&ts.to_rfc3339()).expect("parse RFC3339 timestamp");
        assert_eq!(ts.as_datetime().timestamp(), parsed.as_datetime().timestamp());
        assert!(Timestamp::from_rfc3339("yesterday").is_err());
    }
}
