//! The paginated harvesting loop shared by profile, video and comment
//! capture.
//!
//! The platform exposes no total page count, so the loop is driven by the
//! server's own has-more flag, with a hard wait timeout as the only
//! detector of a broken or absent response. A timeout is a capture-miss:
//! it terminates the loop without asserting that the data ended, and the
//! rows persisted so far remain valid.

use crate::browser::{BrowserError, PageAdvancer, ResponseWaiter};
use crate::models::Page;
use log::{info, warn};
use serde_json::Value;
use std::time::Duration;

/// URL fragments of the intercepted Douyin web APIs, one per capture mode.
pub const PROFILE_PATTERN: &str = "/aweme/v1/web/user/profile/";
pub const VIDEO_LIST_PATTERN: &str = "/aweme/v1/web/aweme/post/";
pub const COMMENT_LIST_PATTERN: &str = "aweme/v1/web/comment/list/";

/// Seam between the loop protocol and the controlled browser. The real
/// implementation pairs a [`ResponseWaiter`] with a [`PageAdvancer`]; tests
/// drive the loop with scripted fakes.
pub trait PageDriver {
    /// Block until the armed response arrives or the timeout elapses.
    /// `None` is a capture-miss, never evidence of no-more-data.
    fn wait_for_page(&mut self) -> Option<Value>;

    /// Trigger the page's lazy-load mechanism to request the next page.
    fn advance(&mut self) -> Result<(), BrowserError>;

    /// Release the interception hook. Called on every loop exit path.
    fn stop(&mut self);
}

/// Outcome of one harvesting loop run. `items` equals the number of records
/// handed to the item callback (and therefore the rows appended for this
/// segment); `capture_miss` distinguishes a timed-out wait from a clean
/// end-of-data, including the zero-item case.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub pages: usize,
    pub items: usize,
    pub capture_miss: bool,
}

/// Run the pagination loop: wait for a page, decode it, feed items to
/// `on_item` (bounded by `cap` when one is set), and keep advancing while
/// the server reports more data. Always stops the driver before returning.
pub fn harvest_pages<T, D, F, G>(
    driver: &mut D,
    label: &str,
    decode: F,
    cap: Option<usize>,
    mut on_item: G,
) -> LoopSummary
where
    D: PageDriver,
    F: Fn(&Value) -> Page<T>,
    G: FnMut(T),
{
    let mut summary = LoopSummary::default();

    loop {
        let body = match driver.wait_for_page() {
            Some(body) => body,
            None => {
                warn!("no response captured for {}; stopping with partial data", label);
                summary.capture_miss = true;
                break;
            }
        };

        summary.pages += 1;
        let page = decode(&body);
        info!(
            "page {} for {}: {} items, has_more={}",
            summary.pages,
            label,
            page.items.len(),
            page.has_more
        );

        for item in page.items {
            if cap.is_some_and(|c| summary.items >= c) {
                break;
            }
            on_item(item);
            summary.items += 1;
        }

        let capped = cap.is_some_and(|c| summary.items >= c);
        if !page.has_more || capped {
            break;
        }

        if let Err(e) = driver.advance() {
            warn!("failed to request next page for {}: {}", label, e);
            break;
        }
    }

    driver.stop();
    summary
}

/// Profile mode: exactly one expected response, not paginated.
pub fn harvest_single<D: PageDriver>(driver: &mut D, label: &str) -> Option<Value> {
    let body = driver.wait_for_page();
    if body.is_none() {
        warn!("no response captured for {}", label);
    }
    driver.stop();
    body
}

/// The browser-backed driver: a waiter armed on a tab plus the scroll-based
/// advancer for that tab.
pub struct BrowserPageDriver {
    waiter: ResponseWaiter,
    pager: PageAdvancer,
    timeout: Duration,
}

impl BrowserPageDriver {
    pub fn new(waiter: ResponseWaiter, pager: PageAdvancer, timeout: Duration) -> Self {
        Self {
            waiter,
            pager,
            timeout,
        }
    }
}

impl PageDriver for BrowserPageDriver {
    fn wait_for_page(&mut self) -> Option<Value> {
        self.waiter.wait(self.timeout)
    }

    fn advance(&mut self) -> Result<(), BrowserError> {
        self.pager.advance()
    }

    fn stop(&mut self) {
        self.waiter.stop();
    }
}
