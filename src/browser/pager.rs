//! Lazy-load trigger: scroll the pagination sentinel into view so the page
//! requests its next batch of data.

use super::manager::BrowserError;
use headless_chrome::Tab;
use std::sync::Arc;
use std::time::Duration;

pub struct PageAdvancer {
    tab: Arc<Tab>,
    sentinel: String,
    settle_delay: Duration,
}

impl PageAdvancer {
    pub fn new(tab: Arc<Tab>, sentinel: &str, settle_delay: Duration) -> Self {
        Self {
            tab,
            sentinel: sentinel.to_string(),
            settle_delay,
        }
    }

    /// Scroll the sentinel element into view, then yield for the settle
    /// delay so the page can issue its request. A missing sentinel falls
    /// back to scrolling the document bottom; either way the only failure
    /// detector is the subsequent response wait timing out.
    pub fn advance(&self) -> Result<(), BrowserError> {
        let script = format!(
            r#"(function() {{
                const el = document.querySelector('{}');
                if (el) {{
                    el.scrollIntoView();
                }} else {{
                    window.scrollTo(0, document.body.scrollHeight);
                }}
            }})()"#,
            self.sentinel.replace('\'', "\\'")
        );

        self.tab
            .evaluate(&script, false)
            .map_err(|e| BrowserError::JavaScriptError(format!("Scroll failed: {}", e)))?;

        std::thread::sleep(self.settle_delay);
        Ok(())
    }
}
