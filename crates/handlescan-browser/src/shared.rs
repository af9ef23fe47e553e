//! Process-wide browser handle with lazy launch and explicit release.

use crate::engine::{BrowserEngine, EngineOptions};
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Owner of at most one running [`BrowserEngine`].
///
/// The engine is launched on the first [`acquire`](Self::acquire) and kept
/// for every later caller until [`shutdown`](Self::shutdown). Acquiring
/// after shutdown launches a fresh engine.
#[derive(Debug)]
pub struct SharedBrowser {
    options: EngineOptions,
    engine: Mutex<Option<Arc<BrowserEngine>>>,
}

impl SharedBrowser {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            engine: Mutex::new(None),
        }
    }

    /// Get the running engine, launching it if needed.
    ///
    /// Concurrent callers wait on the same launch instead of starting
    /// several browsers.
    pub async fn acquire(&self) -> Result<Arc<BrowserEngine>> {
        let mut slot = self.engine.lock().await;
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(BrowserEngine::launch(self.options.clone()).await?);
        info!("shared browser started");
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Whether an engine is currently running.
    pub async fn is_running(&self) -> bool {
        self.engine.lock().await.is_some()
    }

    /// Close the engine if one is running. Safe to call repeatedly.
    pub async fn shutdown(&self) -> Result<()> {
        let engine = self.engine.lock().await.take();
        match engine {
            Some(engine) => {
                engine.close().await?;
                info!("shared browser stopped");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Run `f` with a shared browser and release the browser afterwards.
///
/// Release failures are logged; the result of `f` is returned either way.
pub async fn with_shared_browser<F, Fut, T>(options: EngineOptions, f: F) -> T
where
    F: FnOnce(Arc<SharedBrowser>) -> Fut,
    Fut: Future<Output = T>,
{
    let shared = Arc::new(SharedBrowser::new(options));
    let output = f(Arc::clone(&shared)).await;

    if let Err(e) = shared.shutdown().await {
        warn!("failed to release shared browser: {}", e);
    }

    output
}
