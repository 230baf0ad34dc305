use super::config::BrowserConfig;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;

/// Manages the single browser instance reused sequentially across all
/// targets, and creates tabs for harvesting.
pub struct BrowserManager {
    browser: Arc<Browser>,
}

impl BrowserManager {
    /// Launch a browser with the given configuration
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args: Vec<&OsStr> = config.chrome_flags.iter().map(OsStr::new).collect();
        if let Some(ref ua) = user_agent_arg {
            args.push(OsStr::new(ua));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .args(args)
            .build()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::InitializationError(e.to_string()))?;

        Ok(Self {
            browser: Arc::new(browser),
        })
    }

    /// Create a new tab for harvesting
    pub fn new_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreationError(e.to_string()))
    }
}

/// Navigate a tab to a URL and wait for the navigation to settle.
pub fn navigate(tab: &Tab, url: &str) -> Result<(), BrowserError> {
    tab.navigate_to(url)
        .map_err(|e| BrowserError::NavigationError(format!("Failed to navigate to {}: {}", url, e)))?;

    tab.wait_until_navigated()
        .map_err(|e| BrowserError::NavigationError(format!("Navigation timeout for {}: {}", url, e)))?;

    Ok(())
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    #[error("Browser configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tab creation failed: {0}")]
    TabCreationError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Network interception error: {0}")]
    InterceptionError(String),

    #[error("JavaScript execution error: {0}")]
    JavaScriptError(String),
}
