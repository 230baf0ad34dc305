use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Crawler configuration, loaded from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Creator profile URLs to harvest, processed sequentially.
    pub targets: Vec<String>,

    /// Root directory for all CSV stores and downloaded binaries.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// CSS selector of the pagination sentinel element that, once scrolled
    /// into view, makes the page request its next batch of data.
    #[serde(default = "default_page_sentinel")]
    pub page_sentinel: String,

    #[serde(default)]
    pub pacing: PacingConfig,

    /// Static request context for the video downloader. Supplied externally;
    /// never baked into source.
    #[serde(default)]
    pub request_headers: RequestHeaders,
}

/// Delay and timeout knobs. All pacing is configurable rather than
/// hardcoded so anti-bot spacing can be tuned per deployment.
#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    /// How long to block waiting for an intercepted response before treating
    /// the page as lost.
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Settle time after scrolling the sentinel into view, giving the page a
    /// chance to issue its next request.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,

    /// Pause between targets.
    #[serde(default = "default_inter_target_delay")]
    pub inter_target_delay_secs: u64,
}

/// Pre-built header bundle (authentication/user-agent context) used only by
/// the downloader.
#[derive(Debug, Deserialize, Clone)]
pub struct RequestHeaders {
    #[serde(default)]
    pub cookie: String,
    #[serde(default)]
    pub referer: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_page_sentinel() -> String {
    ".Rcc71LyU".to_string()
}

fn default_wait_timeout() -> u64 {
    10
}

fn default_settle_delay() -> u64 {
    2
}

fn default_inter_target_delay() -> u64 {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
        .to_string()
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            cookie: String::new(),
            referer: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout(),
            settle_delay_secs: default_settle_delay(),
            inter_target_delay_secs: default_inter_target_delay(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl PacingConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn inter_target_delay(&self) -> Duration {
        Duration::from_secs(self.inter_target_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let cfg: Config = toml::from_str(r#"targets = ["https://www.douyin.com/user/abc"]"#).unwrap();
        assert_eq!(cfg.targets.len(), 1);
        assert_eq!(cfg.output_dir, ".");
        assert_eq!(cfg.page_sentinel, ".Rcc71LyU");
        assert_eq!(cfg.pacing.wait_timeout_secs, 10);
        assert_eq!(cfg.pacing.settle_delay_secs, 2);
        assert_eq!(cfg.pacing.inter_target_delay_secs, 5);
        assert!(cfg.request_headers.cookie.is_empty());
        assert!(!cfg.request_headers.user_agent.is_empty());
    }

    #[test]
    fn test_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            targets = ["https://www.douyin.com/user/abc"]
            output_dir = "capture"
            page_sentinel = ".sentinel"

            [pacing]
            wait_timeout_secs = 20
            settle_delay_secs = 1
            inter_target_delay_secs = 3

            [request_headers]
            cookie = "sessionid=abc"
            referer = "https://www.douyin.com/"
            user_agent = "test-agent"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.output_dir, "capture");
        assert_eq!(cfg.page_sentinel, ".sentinel");
        assert_eq!(cfg.pacing.wait_timeout(), Duration::from_secs(20));
        assert_eq!(cfg.request_headers.cookie, "sessionid=abc");
        assert_eq!(cfg.request_headers.user_agent, "test-agent");
    }
}
