use rand::seq::SliceRandom;

/// Common desktop user agents.
const DESKTOP_USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Common desktop viewport sizes.
const DESKTOP_VIEWPORTS: [(u32, u32); 4] = [(1920, 1080), (1366, 768), (1536, 864), (1440, 900)];

/// What the rendered page sees of the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl FingerprintConfig {
    /// Fixed fingerprint, used so rendered probes match plain HTTP probes.
    pub fn fixed(user_agent: impl Into<String>, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            viewport_width,
            viewport_height,
        }
    }

    /// Pick a random common desktop user agent and viewport.
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();
        let user_agent = DESKTOP_USER_AGENTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(DESKTOP_USER_AGENTS[0]);
        let (width, height) = DESKTOP_VIEWPORTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(DESKTOP_VIEWPORTS[0]);

        Self::fixed(user_agent, width, height)
    }

    /// Chromium command-line flag carrying the user agent.
    pub fn user_agent_arg(&self) -> String {
        format!("--user-agent={}", self.user_agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomized_fingerprint() {
        let config = FingerprintConfig::randomized();
        assert!(DESKTOP_USER_AGENTS.contains(&config.user_agent.as_str()));
        assert!(DESKTOP_VIEWPORTS.contains(&(config.viewport_width, config.viewport_height)));
    }

    #[test]
    fn test_fingerprint_variation() {
        // Probabilistic, but ten identical draws out of three agents is very unlikely
        let configs: Vec<_> = (0..10).map(|_| FingerprintConfig::randomized()).collect();
        let first_ua = &configs[0].user_agent;
        assert!(!configs.iter().all(|c| &c.user_agent == first_ua));
    }

    #[test]
    fn test_user_agent_arg() {
        let config = FingerprintConfig::fixed("TestAgent/1.0", 1280, 720);
        assert_eq!(config.user_agent_arg(), "--user-agent=TestAgent/1.0");
    }
}
