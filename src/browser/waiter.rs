//! CDP response interception: arm a URL-pattern filter on a tab and block
//! until a matching JSON body arrives or a timeout elapses.

use super::manager::BrowserError;
use headless_chrome::browser::tab::ResponseHandler;
use headless_chrome::Tab;
use log::debug;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

const HANDLER_NAME: &str = "response-waiter";

/// Matched response bodies the CDP event thread has decoded but the
/// harvesting loop has not consumed yet. Douyin never has more than a
/// couple of list responses in flight per page.
const PENDING_BODIES: usize = 16;

/// Waits for intercepted network responses on one tab.
///
/// `arm` registers a named response handler that decodes every matching
/// body as JSON and queues it; `wait` blocks the harvesting loop until a
/// body is available or the timeout elapses. Only one waiter may be armed
/// per tab at a time, and [`stop`](ResponseWaiter::stop) must run when the
/// loop ends so the interception hook does not leak into the next target
/// (dropping the waiter stops it as well).
pub struct ResponseWaiter {
    tab: Arc<Tab>,
    receiver: Receiver<Value>,
    stopped: bool,
}

impl ResponseWaiter {
    /// Register interest in responses whose request URL contains
    /// `url_pattern`. The subsequent navigation or scroll is what actually
    /// triggers the request.
    pub fn arm(tab: Arc<Tab>, url_pattern: &str) -> Result<Self, BrowserError> {
        let (sender, receiver) = mpsc::sync_channel::<Value>(PENDING_BODIES);
        let pattern = url_pattern.to_string();

        let handler: ResponseHandler = Box::new(move |params, fetch_body| {
            let url = &params.response.url;
            if !url.contains(&pattern) {
                return;
            }

            let body = match fetch_body() {
                Ok(body) => body,
                Err(e) => {
                    debug!("body unavailable for {}: {}", url, e);
                    return;
                }
            };

            if body.base_64_encoded {
                debug!("skipping base64 body for {}", url);
                return;
            }

            match serde_json::from_str::<Value>(&body.body) {
                // A full queue means the loop has fallen behind; dropping
                // the extra body is the same as never capturing it.
                Ok(decoded) => {
                    let _ = sender.try_send(decoded);
                }
                Err(e) => debug!("non-JSON body for {}: {}", url, e),
            }
        });

        tab.register_response_handling(HANDLER_NAME, handler)
            .map_err(|e| BrowserError::InterceptionError(e.to_string()))?;

        Ok(Self {
            tab,
            receiver,
            stopped: false,
        })
    }

    /// Block until a matching decoded body arrives, or `timeout` elapses.
    /// `None` is a capture-miss: it says nothing about whether more data
    /// exists, only that no response was observed in time.
    pub fn wait(&self, timeout: Duration) -> Option<Value> {
        match self.receiver.recv_timeout(timeout) {
            Ok(body) => Some(body),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Deregister the interception hook. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Err(e) = self.tab.deregister_response_handling_all() {
            debug!("failed to deregister response handler: {}", e);
        }
    }
}

impl Drop for ResponseWaiter {
    fn drop(&mut self) {
        self.stop();
    }
}
