//! Handlescan Scanner - Concurrent handle probing.
//!
//! This crate determines whether a handle is registered on each target in a
//! catalog. Every target yields exactly one outcome, `available`, `taken` or
//! `unknown`, no matter how its server behaves.
//!
//! # Features
//!
//! - Bounded concurrency, in sequential batches or a rolling window
//! - Retry with exponential backoff through an explicit state machine
//! - Per-target classification rules with a permissive fuzzy fallback
//! - Pluggable probers: plain HTTP, or a shared headless browser
//! - Progress events as probes settle
//!
//! # Example
//!
//! ```rust,no_run
//! use handlescan_catalog::TargetCatalog;
//! use handlescan_core::{Handle, ProbingConfig};
//! use handlescan_scanner::{CheckOrchestrator, HttpProbe};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProbingConfig::default();
//! let orchestrator = CheckOrchestrator::new(
//!     Arc::new(TargetCatalog::builtin()?),
//!     Arc::new(HttpProbe::new(&config)?),
//! )
//! .with_max_concurrent_probes(config.max_concurrent_probes);
//!
//! let outcomes = orchestrator.check_handle(&Handle::new("alice123")?).await?;
//! for outcome in outcomes {
//!     println!("{}: {}", outcome.target_name, outcome.status);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod classifier;
#[allow(missing_docs)]
pub mod details;
pub mod error;
#[allow(missing_docs)]
pub mod filter;
pub mod fuzzy;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod probe;
#[allow(missing_docs)]
pub mod retry;
#[allow(missing_docs)]
pub mod session;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use classifier::{classify, classify_rendered, Classification, ProbeResponse};
pub use details::ProbeDetails;
pub use error::{Result, ScanError};
pub use filter::TargetFilter;
pub use orchestrator::{CheckOrchestrator, ProbeProgress};
pub use probe::{browser::engine_options, BrowserProbe, HttpProbe, Probe, ProbeOutcome};
pub use retry::{AttemptResult, AttemptState, RetryMachine, RetryPolicy, Sleeper, TokioSleeper, Transition};
#[cfg(any(test, feature = "test-util"))]
pub use retry::RecordingSleeper;
pub use session::CheckSession;
pub use url_builder::build_probe_url;
