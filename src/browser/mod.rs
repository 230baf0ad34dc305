//! Browser automation module for harvesting JavaScript-heavy pages.
//!
//! Douyin's web interface renders everything client-side and feeds data
//! through internal JSON APIs, so instead of parsing HTML this module
//! intercepts the network responses themselves: [`ResponseWaiter`] arms a
//! URL-pattern filter on a tab's CDP network events, and [`PageAdvancer`]
//! triggers the page's lazy-load mechanism to request the next batch.

pub mod config;
pub mod manager;
pub mod pager;
pub mod waiter;

// Re-export main types for convenience
pub use config::BrowserConfig;
pub use manager::{navigate, BrowserError, BrowserManager};
pub use pager::PageAdvancer;
pub use waiter::ResponseWaiter;
