//! Probers: one request strategy per target check type.

pub mod browser;
pub mod http;

use crate::classifier::Classification;
use crate::details::ProbeDetails;
use async_trait::async_trait;
use handlescan_catalog::{TargetCategory, TargetDefinition};
use handlescan_core::{Handle, ProbeStatus};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub use browser::BrowserProbe;
pub use http::HttpProbe;

/// Checks one target for one handle.
///
/// Implementations never fail: network trouble ends as an `unknown`
/// outcome carrying an error message.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, target: &TargetDefinition, handle: &Handle) -> ProbeOutcome;
}

/// Result of checking one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub target_name: String,
    pub resolved_url: String,
    pub status: ProbeStatus,
    /// Wall-clock time across all attempts
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProbeDetails>,
    /// Set only when no attempt produced a response, or the probe itself failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub logo: String,
    pub category: TargetCategory,
}

impl ProbeOutcome {
    /// Outcome of a probe that got a response.
    pub fn classified(
        target: &TargetDefinition,
        resolved_url: String,
        classification: Classification,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            target_name: target.name.clone(),
            resolved_url,
            status: classification.status,
            elapsed_ms,
            details: Some(classification.details),
            error: None,
            logo: target.logo.clone(),
            category: target.category,
        }
    }

    /// Outcome of a probe that never got a response.
    pub fn failed(
        target: &TargetDefinition,
        resolved_url: String,
        error: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            target_name: target.name.clone(),
            resolved_url,
            status: ProbeStatus::Unknown,
            elapsed_ms,
            details: None,
            error: Some(error.into()),
            logo: target.logo.clone(),
            category: target.category,
        }
    }
}

/// Milliseconds since `start`, saturating.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
