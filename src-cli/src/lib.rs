//! Handlescan command-line shell.
//!
//! This is the thin entry point that validates input, wires configuration
//! into the library crates and prints JSON. Probing logic lives in `crates/`.

pub mod cli;
pub mod report;

use anyhow::{Context, Result};
use cli::Cli;
use handlescan_browser::with_shared_browser;
use handlescan_catalog::{CatalogLoader, TargetCatalog, TargetDefinition};
use handlescan_core::{AppConfig, Handle};
use handlescan_scanner::{
    engine_options, BrowserProbe, CheckOrchestrator, HttpProbe, ProbeProgress, RetryPolicy, TargetFilter,
};
use report::CheckReport;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Report(CheckReport),
    Targets(Vec<TargetDefinition>),
}

impl Output {
    /// Render as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Initialize tracing subscriber for logging to stderr.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if verbose { "debug" } else { "info,handlescan=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run the command and print its JSON output to stdout.
pub async fn run(cli: Cli) -> Result<()> {
    let pretty = cli.pretty;
    let output = execute(cli).await?;
    println!("{}", output.to_json(pretty)?);
    Ok(())
}

/// Run the command and return its output.
pub async fn execute(cli: Cli) -> Result<Output> {
    let handle = if cli.list_targets {
        None
    } else {
        let raw = cli.handle.as_deref().unwrap_or_default();
        Some(Handle::new(raw).context("invalid handle")?)
    };

    let config = resolve_config(&cli)?;
    let catalog = Arc::new(load_catalog(&config)?);

    let Some(handle) = handle else {
        let targets = catalog.iter().map(|t| t.as_ref().clone()).collect();
        return Ok(Output::Targets(targets));
    };
    let filter = cli.target_filter();

    info!("Starting Handlescan v{} for '{}'", env!("CARGO_PKG_VERSION"), handle);

    let report = check(&config, catalog, handle, filter).await?;
    Ok(Output::Report(report))
}

/// Load the config file and environment, then apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_with_env(cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(path) = &cli.catalog {
        config.catalog.path = Some(path.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.probing.max_concurrent_probes = concurrency;
    }
    if cli.browser {
        config.browser.enabled = true;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn load_catalog(config: &AppConfig) -> Result<TargetCatalog> {
    match &config.catalog.path {
        Some(path) => {
            let loader = CatalogLoader::new(path).context("catalog not found")?;
            TargetCatalog::load_from(&loader).with_context(|| format!("failed to load catalog from {}", path.display()))
        }
        None => TargetCatalog::builtin().context("built-in catalog is invalid"),
    }
}

async fn check(config: &AppConfig, catalog: Arc<TargetCatalog>, handle: Handle, filter: TargetFilter) -> Result<CheckReport> {
    let http_probe = HttpProbe::new(&config.probing).context("failed to build HTTP probe")?;
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ProbeProgress>();

    let progress_task = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            debug!(
                completed = progress.completed,
                total = progress.total,
                status = %progress.status,
                "{} settled",
                progress.target_name
            );
        }
    });

    let options = engine_options(&config.browser, &config.probing);
    let session_timeout = config.session.timeout();

    // The browser is only launched if a browser target is actually probed
    let results = with_shared_browser(options, |browser| async move {
        let mut orchestrator = CheckOrchestrator::new(catalog, Arc::new(http_probe))
            .with_max_concurrent_probes(config.probing.max_concurrent_probes)
            .with_dispatch_mode(config.probing.dispatch_mode)
            .with_progress(progress_tx);

        if config.browser.enabled {
            let probe = BrowserProbe::new(browser, RetryPolicy::from_config(&config.probing));
            orchestrator = orchestrator.with_browser_probe(Arc::new(probe));
        }

        let check = orchestrator.check_handle_filtered(&handle, &filter);
        let results = match session_timeout {
            Some(limit) => tokio::time::timeout(limit, check)
                .await
                .with_context(|| format!("check did not finish within {}s", limit.as_secs()))?,
            None => check.await,
        };

        results.map(|r| (handle, r)).context("check failed")
    })
    .await;

    // Every sender is gone once the orchestrator is dropped
    let _ = progress_task.await;

    let (handle, results) = results?;
    Ok(CheckReport::new(handle, results))
}
