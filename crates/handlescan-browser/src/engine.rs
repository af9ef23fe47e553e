use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::stream::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Launch options for a [`BrowserEngine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub headless: bool,
    pub navigation_timeout: Duration,
    pub fingerprint: FingerprintConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout: Duration::from_secs(10),
            fingerprint: FingerprintConfig::randomized(),
        }
    }
}

/// The settled state of a page after navigation.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub title: Option<String>,
    pub html: String,
}

/// A running Chromium instance.
pub struct BrowserEngine {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    fingerprint: FingerprintConfig,
    navigation_timeout: Duration,
}

impl BrowserEngine {
    /// Launch Chromium with the given options.
    pub async fn launch(options: EngineOptions) -> Result<Self> {
        let fingerprint = options.fingerprint;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .arg(fingerprint.user_agent_arg());
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {}", e);
                }
            }
        });

        debug!(
            headless = options.headless,
            width = fingerprint.viewport_width,
            height = fingerprint.viewport_height,
            "launched browser"
        );

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            fingerprint,
            navigation_timeout: options.navigation_timeout,
        })
    }

    /// Open `url` in a fresh tab, wait for it to settle and return its content.
    ///
    /// The tab is closed whether or not navigation succeeds.
    pub async fn render(&self, url: &str) -> Result<RenderedPage> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| BrowserError::ChromiumError(e.to_string()))?
        };

        let navigation = tokio::time::timeout(self.navigation_timeout, async {
            let nav_err = |e: chromiumoxide::error::CdpError| BrowserError::NavigationError(e.to_string());

            page.goto(url).await.map_err(nav_err)?;
            page.wait_for_navigation().await.map_err(nav_err)?;

            let html = page.content().await.map_err(nav_err)?;
            let title = page.get_title().await.map_err(nav_err)?;

            Ok::<_, BrowserError>(RenderedPage { title, html })
        })
        .await;

        if let Err(e) = page.close().await {
            warn!("failed to close page for {}: {}", url, e);
        }

        match navigation {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout(url.to_string())),
        }
    }

    /// Close the browser process.
    pub async fn close(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        if let Err(e) = browser.wait().await {
            warn!("browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        debug!("closed browser");
        Ok(())
    }
}

impl std::fmt::Debug for BrowserEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserEngine")
            .field("fingerprint", &self.fingerprint)
            .field("navigation_timeout", &self.navigation_timeout)
            .finish_non_exhaustive()
    }
}
