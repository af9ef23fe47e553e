use handlescan_catalog::{TargetCategory, TargetDefinition};
use handlescan_core::{Handle, ProbeStatus, ProbingConfig};
use handlescan_scanner::{HttpProbe, Probe, RecordingSleeper};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn handle() -> Handle {
    Handle::new("alice123").expect("valid handle")
}

fn github_like(server: &MockServer) -> TargetDefinition {
    let mut target = TargetDefinition::new("GitHub", server.url("/{handle}"))
        .with_expected_status(404, true)
        .with_category(TargetCategory::Development);
    target.logo = "https://github.com/favicon.ico".to_string();
    target
}

fn probe_with(config: ProbingConfig) -> (HttpProbe, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::new());
    let probe = HttpProbe::new(&config)
        .expect("build probe")
        .with_sleeper(sleeper.clone());
    (probe, sleeper)
}

fn fast_config() -> ProbingConfig {
    ProbingConfig {
        timeout_ms: 200,
        ..ProbingConfig::default()
    }
}

#[tokio::test]
async fn test_not_found_status_is_available() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/alice123");
            then.status(404).body("<html><title>alice123</title></html>");
        })
        .await;

    let (probe, sleeper) = probe_with(fast_config());
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    mock.assert_async().await;
    assert_eq!(outcome.status, ProbeStatus::Available);
    assert!(outcome.error.is_none());
    assert_eq!(outcome.resolved_url, server.url("/alice123"));
    assert_eq!(outcome.logo, "https://github.com/favicon.ico");
    assert_eq!(outcome.category, TargetCategory::Development);
    assert_eq!(outcome.details.and_then(|d| d.status_code), Some(404));
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_profile_page_mentioning_handle_is_taken() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice123");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(r#"<html><head><title>alice123 (Alice)</title></head><body><img alt="alice123's avatar"></body></html>"#);
        })
        .await;

    let (probe, _) = probe_with(fast_config());
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    assert_eq!(outcome.status, ProbeStatus::Taken);
    let details = outcome.details.expect("details present");
    assert_eq!(details.page_title.as_deref(), Some("alice123 (Alice)"));
    assert!(details.has_profile_image);
    assert_eq!(details.content_type.as_deref(), Some("text/html; charset=utf-8"));
}

#[tokio::test]
async fn test_soft_not_found_page_is_available() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice123");
            then.status(200).body("<p>Sorry, user not found</p>");
        })
        .await;

    let (probe, _) = probe_with(fast_config());
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    assert_eq!(outcome.status, ProbeStatus::Available);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_sends_browser_like_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/alice123")
                .header_exists("user-agent")
                .header("accept-language", "en-US,en;q=0.5")
                .header("upgrade-insecure-requests", "1");
            then.status(404);
        })
        .await;

    let (probe, _) = probe_with(fast_config());
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    mock.assert_async().await;
    assert_eq!(outcome.status, ProbeStatus::Available);
}

#[tokio::test]
async fn test_timeout_on_every_attempt_is_unknown_with_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice123");
            then.status(200).body("alice123").delay(Duration::from_millis(1_000));
        })
        .await;

    let config = ProbingConfig {
        timeout_ms: 100,
        ..ProbingConfig::default()
    };
    let (probe, sleeper) = probe_with(config);
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    assert_eq!(outcome.status, ProbeStatus::Unknown);
    let error = outcome.error.expect("error present");
    assert!(error.contains("timed out"), "unexpected error: {error}");
    assert!(outcome.details.is_none());
    assert!(outcome.elapsed_ms >= 300);
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_connection_refused_is_unknown_with_error() {
    // Bind then drop a listener to get a port with nothing behind it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let target = TargetDefinition::new("Closed", format!("http://127.0.0.1:{port}/{{handle}}"));

    let config = ProbingConfig {
        max_retries: 1,
        ..fast_config()
    };
    let (probe, sleeper) = probe_with(config);
    let outcome = probe.probe(&target, &handle()).await;

    assert_eq!(outcome.status, ProbeStatus::Unknown);
    assert!(outcome.error.is_some());
    assert_eq!(sleeper.delays().len(), 1);
}

#[tokio::test]
async fn test_inconclusive_status_retries_then_settles_without_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/alice123");
            then.status(503);
        })
        .await;

    let (probe, sleeper) = probe_with(fast_config());
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    assert_eq!(mock.hits_async().await, 3);
    assert_eq!(outcome.status, ProbeStatus::Unknown);
    assert!(outcome.error.is_none());
    assert_eq!(outcome.details.and_then(|d| d.status_code), Some(503));
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_redirect_limit_is_a_transport_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice123");
            then.status(302).header("Location", "/alice123");
        })
        .await;

    let config = ProbingConfig {
        max_retries: 0,
        ..fast_config()
    };
    let (probe, _) = probe_with(config);
    let outcome = probe.probe(&github_like(&server), &handle()).await;

    assert_eq!(outcome.status, ProbeStatus::Unknown);
    assert!(outcome.error.is_some());
}
