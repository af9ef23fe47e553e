use super::{elapsed_ms, Probe, ProbeOutcome};
use crate::classifier::{classify_rendered, Classification};
use crate::retry::{AttemptResult, RetryMachine, RetryPolicy, Sleeper, TokioSleeper};
use crate::url_builder::build_probe_url;
use async_trait::async_trait;
use handlescan_browser::{EngineOptions, FingerprintConfig, SharedBrowser};
use handlescan_catalog::TargetDefinition;
use handlescan_core::{BrowserConfig, Handle, ProbingConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Engine options derived from the browser and probing settings.
///
/// Without fingerprint randomization the browser presents the same user
/// agent as the HTTP probe.
pub fn engine_options(browser: &BrowserConfig, probing: &ProbingConfig) -> EngineOptions {
    let fingerprint = if browser.randomize_fingerprint {
        FingerprintConfig::randomized()
    } else {
        FingerprintConfig::fixed(&probing.user_agent, browser.window_width, browser.window_height)
    };

    EngineOptions {
        headless: browser.headless,
        navigation_timeout: Duration::from_secs(browser.navigation_timeout_secs),
        fingerprint,
    }
}

/// Probes a target by rendering its page in the shared browser.
#[derive(Clone)]
pub struct BrowserProbe {
    browser: Arc<SharedBrowser>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl BrowserProbe {
    pub fn new(browser: Arc<SharedBrowser>, policy: RetryPolicy) -> Self {
        Self {
            browser,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    async fn render_and_classify(&self, url: &str, handle: &Handle) -> (AttemptResult, Result<Classification, String>) {
        let engine = match self.browser.acquire().await {
            Ok(engine) => engine,
            Err(e) => return (AttemptResult::TransportFailed, Err(format!("browser unavailable: {e}"))),
        };

        match engine.render(url).await {
            Ok(page) => {
                let classification = classify_rendered(page.title.as_deref(), &page.html, handle);
                let result = if classification.status.is_conclusive() {
                    AttemptResult::Confident
                } else {
                    AttemptResult::Inconclusive
                };
                (result, Ok(classification))
            }
            Err(e) => (AttemptResult::TransportFailed, Err(e.to_string())),
        }
    }
}

#[async_trait]
impl Probe for BrowserProbe {
    async fn probe(&self, target: &TargetDefinition, handle: &Handle) -> ProbeOutcome {
        let url = build_probe_url(target, handle);
        let url_ref = url.as_str();
        let start = Instant::now();

        let settled = RetryMachine::new(self.policy)
            .run(self.sleeper.as_ref(), &target.name, |attempt| async move {
                debug!(target_name = %target.name, attempt = attempt + 1, url = url_ref, "rendering probe");
                self.render_and_classify(url_ref, handle).await
            })
            .await;

        let elapsed = elapsed_ms(start);
        match settled {
            Ok(classification) => ProbeOutcome::classified(target, url, classification, elapsed),
            Err(reason) => {
                warn!(target_name = %target.name, elapsed_ms = elapsed, "rendered probe failed: {}", reason);
                ProbeOutcome::failed(target, url, reason, elapsed)
            }
        }
    }
}

impl std::fmt::Debug for BrowserProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserProbe")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
