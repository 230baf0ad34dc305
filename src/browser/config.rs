//! Launch configuration for the single Chrome instance the crawl reuses
//! across all targets.

/// Launch settings consumed by [`BrowserManager`](super::BrowserManager).
/// Per-page timing (response waits, settle delays) is deliberately not
/// here — that lives with the pacing configuration, next to the other
/// crawl-level knobs.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run Chrome without a visible window.
    pub headless: bool,

    /// Viewport size. Douyin collapses the video grid below desktop
    /// widths, which changes which list APIs the page calls.
    pub window_size: (u32, u32),

    /// User agent presented by the browser. The coordinator keeps this in
    /// sync with the downloader's header bundle so intercepted page
    /// requests and direct video fetches look like the same client.
    pub user_agent: Option<String>,

    /// Extra Chrome command-line flags.
    pub chrome_flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            user_agent: None,
            chrome_flags: vec![],
        }
    }
}

impl BrowserConfig {
    /// Configuration with flags that reduce automation fingerprints.
    /// Douyin serves a degraded page to obviously automated browsers.
    pub fn stealth_mode() -> Self {
        Self {
            chrome_flags: vec![
                "--disable-blink-features=AutomationControlled".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--no-sandbox".to_string(),
            ],
            ..Self::default()
        }
    }
}
