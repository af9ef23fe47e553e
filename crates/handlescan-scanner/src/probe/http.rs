use super::{elapsed_ms, Probe, ProbeOutcome};
use crate::classifier::{classify, Classification, ProbeResponse};
use crate::error::Result;
use crate::retry::{AttemptResult, RetryMachine, RetryPolicy, Sleeper, TokioSleeper};
use crate::url_builder::build_probe_url;
use async_trait::async_trait;
use handlescan_catalog::{HttpMethod, TargetDefinition};
use handlescan_core::{Handle, ProbingConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, UPGRADE_INSECURE_REQUESTS};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Probes a target with a plain HTTP request.
#[derive(Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    policy: RetryPolicy,
    timeout: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl HttpProbe {
    /// Build a probe from the probing settings.
    ///
    /// Every status code counts as a response; only transport problems
    /// (connect, timeout, redirect limit, body read) count as failures.
    pub fn new(config: &ProbingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(Self::default_headers())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            policy: RetryPolicy::from_config(config),
            timeout: config.timeout(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used for backoff.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    // Accept-Encoding is added by reqwest for the enabled decoders.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers
    }

    async fn fetch(&self, method: HttpMethod, url: &str) -> std::result::Result<ProbeResponse, reqwest::Error> {
        let method = match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
        };

        let response = self.client.request(method, url).send().await?;
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(ProbeResponse {
            status_code,
            content_type,
            body,
        })
    }

    fn describe_failure(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("request timed out after {} ms", self.timeout.as_millis())
        } else if err.is_redirect() {
            format!("too many redirects: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, target: &TargetDefinition, handle: &Handle) -> ProbeOutcome {
        let url = build_probe_url(target, handle);
        let url_ref = url.as_str();
        let start = Instant::now();

        let settled: std::result::Result<Classification, String> = RetryMachine::new(self.policy)
            .run(self.sleeper.as_ref(), &target.name, |attempt| async move {
                debug!(target_name = %target.name, attempt = attempt + 1, url = url_ref, "sending probe");

                match self.fetch(target.method, url_ref).await {
                    Ok(response) => {
                        let classification = classify(target, &response, handle);
                        let result = if classification.status.is_conclusive() {
                            AttemptResult::Confident
                        } else {
                            AttemptResult::Inconclusive
                        };
                        (result, Ok(classification))
                    }
                    Err(e) => (AttemptResult::TransportFailed, Err(self.describe_failure(&e))),
                }
            })
            .await;

        let elapsed = elapsed_ms(start);
        match settled {
            Ok(classification) => {
                debug!(target_name = %target.name, status = %classification.status, elapsed_ms = elapsed, "probe settled");
                ProbeOutcome::classified(target, url, classification, elapsed)
            }
            Err(reason) => {
                warn!(target_name = %target.name, elapsed_ms = elapsed, "probe failed: {}", reason);
                ProbeOutcome::failed(target, url, reason, elapsed)
            }
        }
    }
}

impl std::fmt::Debug for HttpProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProbe")
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
