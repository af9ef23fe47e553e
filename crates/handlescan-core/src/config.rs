//! Configuration management for Handlescan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Browser-like User-Agent sent with every probe request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main application configuration.
///
/// This is loaded from `~/.config/handlescan/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Probe client and orchestration settings
    pub probing: ProbingConfig,
    /// Headless browser settings for `browser` targets
    pub browser: BrowserConfig,
    /// Target catalog source
    pub catalog: CatalogConfig,
    /// Session-level settings applied by the entry point
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from the XDG path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML or fail validation
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `HANDLESCAN_MAX_CONCURRENT`: Override max concurrent probes
    /// - `HANDLESCAN_TIMEOUT_MS`: Override per-attempt request timeout
    /// - `HANDLESCAN_MAX_RETRIES`: Override retries after the first attempt
    /// - `HANDLESCAN_HEADLESS`: Override browser headless mode (true/false)
    /// - `HANDLESCAN_CATALOG`: Override the catalog path
    pub fn load_with_env(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `HANDLESCAN_*` overrides using the given variable lookup.
    ///
    /// Unparseable values are ignored and logged.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HANDLESCAN_MAX_CONCURRENT") {
            match val.parse() {
                Ok(max) => {
                    self.probing.max_concurrent_probes = max;
                    tracing::debug!("Override probing.max_concurrent_probes from env: {}", max);
                }
                Err(_) => tracing::warn!("Ignoring invalid HANDLESCAN_MAX_CONCURRENT: {}", val),
            }
        }

        if let Some(val) = lookup("HANDLESCAN_TIMEOUT_MS") {
            match val.parse() {
                Ok(ms) => {
                    self.probing.timeout_ms = ms;
                    tracing::debug!("Override probing.timeout_ms from env: {}", ms);
                }
                Err(_) => tracing::warn!("Ignoring invalid HANDLESCAN_TIMEOUT_MS: {}", val),
            }
        }

        if let Some(val) = lookup("HANDLESCAN_MAX_RETRIES") {
            match val.parse() {
                Ok(retries) => {
                    self.probing.max_retries = retries;
                    tracing::debug!("Override probing.max_retries from env: {}", retries);
                }
                Err(_) => tracing::warn!("Ignoring invalid HANDLESCAN_MAX_RETRIES: {}", val),
            }
        }

        if let Some(val) = lookup("HANDLESCAN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("HANDLESCAN_CATALOG") {
            if !val.is_empty() {
                tracing::debug!("Override catalog.path from env: {}", val);
                self.catalog.path = Some(PathBuf::from(val));
            }
        }
    }

    /// Validate value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.probing.max_concurrent_probes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probing.max_concurrent_probes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.probing.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probing.timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.probing.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "probing.user_agent".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.browser.navigation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.navigation_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/handlescan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("dev", "handlescan", "handlescan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// How probes are dispatched across the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Fixed-size batches processed strictly one after another
    #[default]
    Batched,
    /// Keep up to the concurrency limit in flight across the whole catalog
    Rolling,
}

/// Probe client and orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbingConfig {
    /// Maximum number of probes in flight at once
    pub max_concurrent_probes: usize,
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Per-attempt request timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum redirect hops followed per request
    pub max_redirects: usize,
    /// Base backoff delay in milliseconds, doubled per attempt
    pub backoff_base_ms: u64,
    /// User agent string
    pub user_agent: String,
    /// Batch dispatch strategy
    pub dispatch_mode: DispatchMode,
}

impl ProbingConfig {
    /// Per-attempt request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base backoff delay.
    #[must_use]
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for ProbingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_probes: 5,
            max_retries: 2,
            timeout_ms: 10_000,
            max_redirects: 5,
            backoff_base_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            dispatch_mode: DispatchMode::Batched,
        }
    }
}

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Probe `browser` targets with Chromium (otherwise they fall back to HTTP)
    pub enabled: bool,
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Pick a random desktop user agent and viewport at launch
    pub randomize_fingerprint: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            headless: true,
            window_width: 1280,
            window_height: 720,
            navigation_timeout_secs: 10,
            randomize_fingerprint: false,
        }
    }
}

/// Target catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML file or directory of TOML files; the built-in catalog when unset
    pub path: Option<PathBuf>,
}

/// Session-level settings applied by the entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Overall deadline for one check in seconds (0 = no deadline)
    pub timeout_secs: u64,
}

impl SessionConfig {
    /// Session deadline, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.probing.max_concurrent_probes, 5);
        assert_eq!(config.probing.max_retries, 2);
        assert_eq!(config.probing.timeout(), Duration::from_secs(10));
        assert_eq!(config.probing.max_redirects, 5);
        assert_eq!(config.probing.dispatch_mode, DispatchMode::Batched);
        assert!(!config.browser.enabled);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.session.timeout(), Some(Duration::from_secs(60)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[probing]"));
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("dispatch_mode = \"batched\""));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.probing.user_agent, config.probing.user_agent);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[probing]
max_concurrent_probes = 8
dispatch_mode = "rolling"

[session]
timeout_secs = 0
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.probing.max_concurrent_probes, 8);
        assert_eq!(config.probing.dispatch_mode, DispatchMode::Rolling);
        assert_eq!(config.session.timeout(), None);
        // Defaults
        assert_eq!(config.probing.timeout_ms, 10_000);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[probing]\ntimeout_ms = 2500\n").expect("write config file");

        let config = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(config.probing.timeout_ms, 2500);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = AppConfig::load_from(Path::new("/nonexistent/handlescan.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_from_rejects_zero_concurrency() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[probing]\nmax_concurrent_probes = 0\n").expect("write config");

        let result = AppConfig::load_from(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("HANDLESCAN_MAX_CONCURRENT", "3"),
            ("HANDLESCAN_TIMEOUT_MS", "not-a-number"),
            ("HANDLESCAN_MAX_RETRIES", "0"),
            ("HANDLESCAN_HEADLESS", "false"),
            ("HANDLESCAN_CATALOG", "/etc/handlescan/targets.toml"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.probing.max_concurrent_probes, 3);
        assert_eq!(config.probing.timeout_ms, 10_000);
        assert_eq!(config.probing.max_retries, 0);
        assert!(!config.browser.headless);
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("/etc/handlescan/targets.toml"))
        );
    }
}
