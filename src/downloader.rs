//! Blocking HTTP downloader for video binaries.
//!
//! The request context (cookie, referer, user agent) is supplied from
//! configuration at construction time. No retries: a failed download is
//! terminal for that one video and the caller decides to skip it.

use crate::config::RequestHeaders;
use log::info;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct VideoDownloader {
    client: Client,
}

impl VideoDownloader {
    pub fn new(headers: &RequestHeaders) -> Result<Self, DownloadError> {
        let mut default_headers = HeaderMap::new();

        if !headers.cookie.is_empty() {
            let value = HeaderValue::from_str(&headers.cookie)
                .map_err(|_| DownloadError::InvalidHeader("cookie"))?;
            default_headers.insert(COOKIE, value);
        }

        if !headers.referer.is_empty() {
            let value = HeaderValue::from_str(&headers.referer)
                .map_err(|_| DownloadError::InvalidHeader("referer"))?;
            default_headers.insert(REFERER, value);
        }

        let client = Client::builder()
            .user_agent(headers.user_agent.clone())
            .default_headers(default_headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the raw bytes of a resource. Errors on any transport failure or
    /// non-success status.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    /// Download a video and write it as `{video_id}.mp4` under `dir`.
    pub fn save(&self, url: &str, dir: &Path, video_id: &str) -> Result<PathBuf, DownloadError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.mp4", video_id));

        let bytes = self.fetch(url)?;
        fs::write(&path, bytes)?;

        info!("saved video {} to {}", video_id, path.display());
        Ok(path)
    }
}
