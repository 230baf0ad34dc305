// Library interface for douyin_harvester
// This allows tests and external crates to use the crawler components

pub mod browser;
pub mod config;
pub mod crawler;
pub mod downloader;
pub mod extract;
pub mod harvester;
pub mod helpers;
pub mod models;
pub mod sink;
