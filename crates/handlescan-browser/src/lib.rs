//! Headless browser rendering for targets that only answer to a real browser.
//!
//! The engine is expensive to launch, so it is shared process-wide through
//! [`SharedBrowser`]: launched lazily on first use and released explicitly
//! by whoever owns it.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod shared;

pub use engine::{BrowserEngine, EngineOptions, RenderedPage};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use shared::{with_shared_browser, SharedBrowser};
