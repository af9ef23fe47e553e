//! Check orchestrator for probing a handle across the catalog.
//!
//! This module provides the `CheckOrchestrator` which dispatches probes with
//! bounded concurrency, survives individual probe failures and assembles one
//! outcome per target in catalog order.

use crate::error::{Result, ScanError};
use crate::filter::TargetFilter;
use crate::probe::{Probe, ProbeOutcome};
use crate::session::CheckSession;
use crate::url_builder::build_probe_url;
use handlescan_catalog::{CheckType, TargetCatalog, TargetDefinition};
use handlescan_core::{DispatchMode, Handle, ProbeStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Default number of probes in flight.
const DEFAULT_MAX_CONCURRENT_PROBES: usize = 5;

/// Emitted each time a probe settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeProgress {
    /// Probes settled so far, including this one
    pub completed: usize,
    /// Probes in this check
    pub total: usize,
    /// Target whose probe settled
    pub target_name: String,
    /// Its verdict
    pub status: ProbeStatus,
}

/// Orchestrates probing of a handle across many targets.
pub struct CheckOrchestrator {
    /// Targets to probe
    catalog: Arc<TargetCatalog>,
    /// Probe for `http` targets, and the fallback for everything else
    http_probe: Arc<dyn Probe>,
    /// Probe for `browser` targets
    browser_probe: Option<Arc<dyn Probe>>,
    /// Maximum concurrent probes
    max_concurrent_probes: usize,
    dispatch_mode: DispatchMode,
    progress: Option<mpsc::UnboundedSender<ProbeProgress>>,
}

impl CheckOrchestrator {
    /// Create a new check orchestrator.
    #[must_use]
    pub fn new(catalog: Arc<TargetCatalog>, http_probe: Arc<dyn Probe>) -> Self {
        Self {
            catalog,
            http_probe,
            browser_probe: None,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            dispatch_mode: DispatchMode::default(),
            progress: None,
        }
    }

    /// Use this probe for targets with the `browser` check type.
    #[must_use]
    pub fn with_browser_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.browser_probe = Some(probe);
        self
    }

    /// Set the maximum number of concurrent probes. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = max.max(1);
        self
    }

    /// Set how probes are dispatched.
    #[must_use]
    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    /// Report each settled probe on `sender`.
    #[must_use]
    pub fn with_progress(mut self, sender: mpsc::UnboundedSender<ProbeProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// The catalog this orchestrator probes.
    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    /// Probe every catalog target for `handle`.
    ///
    /// Returns one outcome per target in catalog order. Fails only when the
    /// catalog is empty.
    pub async fn check_handle(&self, handle: &Handle) -> Result<Vec<ProbeOutcome>> {
        self.check_handle_filtered(handle, &TargetFilter::All).await
    }

    /// Probe the targets selected by `filter`, in catalog order.
    pub async fn check_handle_filtered(&self, handle: &Handle, filter: &TargetFilter) -> Result<Vec<ProbeOutcome>> {
        let targets = filter.select(&self.catalog);
        if targets.is_empty() {
            return Err(ScanError::NoTargets);
        }

        let mut session = CheckSession::new(handle.clone(), targets.len());
        let width = self.max_concurrent_probes;
        let semaphore = Arc::new(Semaphore::new(width));

        tracing::info!(
            session_id = %session.id(),
            handle = %handle,
            targets = targets.len(),
            max_concurrent = width,
            mode = ?self.dispatch_mode,
            "starting handle check"
        );

        match self.dispatch_mode {
            DispatchMode::Batched => {
                let mut start = 0;
                while start < targets.len() {
                    let end = (start + width).min(targets.len());
                    tracing::debug!(session_id = %session.id(), batch_start = start, batch_end = end, "dispatching batch");
                    self.run_group(start..end, &targets, &semaphore, &mut session).await;
                    start = end;
                }
            }
            DispatchMode::Rolling => {
                self.run_group(0..targets.len(), &targets, &semaphore, &mut session).await;
            }
        }

        let session_id = session.id();
        let outcomes = session.finish(&targets);

        let count = |status: ProbeStatus| outcomes.iter().filter(|o| o.status == status).count();
        tracing::info!(
            session_id = %session_id,
            available = count(ProbeStatus::Available),
            taken = count(ProbeStatus::Taken),
            unknown = count(ProbeStatus::Unknown),
            "handle check complete"
        );

        Ok(outcomes)
    }

    /// Probe `range` of `targets` concurrently, gated by `semaphore`, and wait
    /// for all of them to settle.
    async fn run_group(
        &self,
        range: Range<usize>,
        targets: &[Arc<TargetDefinition>],
        semaphore: &Arc<Semaphore>,
        session: &mut CheckSession,
    ) {
        let mut tasks = JoinSet::new();
        let mut task_targets = HashMap::new();

        for index in range {
            let target = Arc::clone(&targets[index]);
            let probe = self.probe_for(&target);
            let handle = session.handle().clone();
            let semaphore = Arc::clone(semaphore);

            let abort_handle = tasks.spawn(async move {
                // Never closed, so a permit is always granted
                let _permit = semaphore.acquire_owned().await.ok();
                probe.probe(&target, &handle).await
            });
            task_targets.insert(abort_handle.id(), index);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (index, outcome) = match joined {
                Ok((id, outcome)) => match task_targets.get(&id) {
                    Some(&index) => (index, outcome),
                    None => continue,
                },
                Err(e) => {
                    let Some(&index) = task_targets.get(&e.id()) else {
                        continue;
                    };
                    let target = &targets[index];
                    tracing::error!(
                        session_id = %session.id(),
                        target_name = %target.name,
                        "probe task failed: {}",
                        e
                    );
                    let url = build_probe_url(target, session.handle());
                    (index, ProbeOutcome::failed(target, url, format!("probe task failed: {e}"), 0))
                }
            };

            self.report_progress(session.completed() + 1, session.total(), &outcome);
            session.place(index, outcome);
        }
    }

    fn probe_for(&self, target: &TargetDefinition) -> Arc<dyn Probe> {
        match (target.check_type, &self.browser_probe) {
            (CheckType::Browser, Some(browser)) => Arc::clone(browser),
            (CheckType::Browser, None) => {
                tracing::warn!(
                    target_name = %target.name,
                    "no browser probe configured, falling back to HTTP"
                );
                Arc::clone(&self.http_probe)
            }
            (CheckType::Http, _) => Arc::clone(&self.http_probe),
        }
    }

    fn report_progress(&self, completed: usize, total: usize, outcome: &ProbeOutcome) {
        if let Some(sender) = &self.progress {
            // A dropped receiver just means nobody is listening any more
            let _ = sender.send(ProbeProgress {
                completed,
                total,
                target_name: outcome.target_name.clone(),
                status: outcome.status,
            });
        }
    }
}
