//! Per-target orchestration: profile capture, video enumeration with
//! downloads and stats, and the nested comment harvest for every video.
//!
//! One browser instance is reused sequentially across all targets. Failures
//! are contained per unit of work: a capture-miss ends that loop with
//! partial data, a failed download or row write skips that one item, and an
//! error anywhere in a target skips to the next target. Only browser or
//! configuration errors escape to the caller.

use crate::browser::{
    self, BrowserConfig, BrowserError, BrowserManager, PageAdvancer, ResponseWaiter,
};
use crate::config::Config;
use crate::downloader::{DownloadError, VideoDownloader};
use crate::extract::{decode_comment_page, decode_profile, decode_video_page};
use crate::harvester::{
    harvest_pages, harvest_single, BrowserPageDriver, LoopSummary, COMMENT_LIST_PATTERN,
    PROFILE_PATTERN, VIDEO_LIST_PATTERN,
};
use crate::helpers::{format_duration, sanitize_for_path};
use crate::models::{CommentRecord, ProfileInfo, VideoRecord};
use crate::sink;
use headless_chrome::Tab;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

/// Shared profile store, one row per captured profile across all targets.
pub const PROFILE_STORE: &str = "douyin_users_info.csv";

const PROFILE_COLUMNS: &[&str] = &["用户主页", "昵称", "身份认证", "粉丝数", "排名认证"];
const STATS_COLUMNS: &[&str] = &[
    "视频ID", "描述", "话题标签", "发布时间", "视频链接", "点赞量", "转发量", "收藏量",
    "评论量", "推荐量", "时长",
];
const COMMENT_COLUMNS: &[&str] = &["昵称", "地区", "时间", "评论"];

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("downloader setup failed: {0}")]
    Download(#[from] DownloadError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Drives the whole crawl. Owns the single browser instance; dropping the
/// coordinator releases it, on normal completion and on fatal errors alike.
pub struct CrawlCoordinator {
    config: Config,
    manager: BrowserManager,
    downloader: VideoDownloader,
}

impl CrawlCoordinator {
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let mut browser_config = BrowserConfig::stealth_mode();
        browser_config.user_agent = Some(config.request_headers.user_agent.clone());

        let manager = BrowserManager::new(browser_config)?;
        let downloader = VideoDownloader::new(&config.request_headers)?;

        Ok(Self {
            config,
            manager,
            downloader,
        })
    }

    /// Process every configured target in sequence. Errors in one target are
    /// logged and never abort the siblings.
    pub fn run(&self, max_videos: usize) {
        for target in &self.config.targets {
            info!("processing target: {}", target);

            match self.crawl_target(target, max_videos) {
                Ok(()) => info!("finished target: {}", target),
                Err(e) => error!("target {} failed: {}", target, e),
            }

            thread::sleep(self.config.pacing.inter_target_delay());
        }
    }

    fn crawl_target(&self, target: &str, max_videos: usize) -> Result<(), CrawlError> {
        let tab = self.manager.new_tab()?;
        let result = self.crawl_target_on_tab(&tab, target, max_videos);

        if let Err(e) = tab.close(false) {
            debug!("failed to close tab for {}: {}", target, e);
        }

        result
    }

    fn crawl_target_on_tab(
        &self,
        tab: &Arc<Tab>,
        target: &str,
        max_videos: usize,
    ) -> Result<(), CrawlError> {
        let profile = self.capture_profile(tab, target)?;

        let Some(profile) = profile else {
            warn!("skipping target {}: no profile captured", target);
            return Ok(());
        };

        info!(
            "profile captured: {} ({} followers)",
            profile.nickname, profile.followers_count
        );
        self.save_profile(target, &profile);

        self.harvest_videos(tab, target, &profile, max_videos)?;
        Ok(())
    }

    /// Profile mode: one expected response on the target's first page.
    fn capture_profile(
        &self,
        tab: &Arc<Tab>,
        target: &str,
    ) -> Result<Option<ProfileInfo>, CrawlError> {
        let waiter = ResponseWaiter::arm(Arc::clone(tab), PROFILE_PATTERN)?;
        let pager = self.pager_for(tab);
        browser::navigate(tab, target)?;

        let mut driver =
            BrowserPageDriver::new(waiter, pager, self.config.pacing.wait_timeout());
        let body = harvest_single(&mut driver, target);

        Ok(body.as_ref().and_then(decode_profile))
    }

    fn save_profile(&self, target: &str, profile: &ProfileInfo) {
        let path = Path::new(&self.config.output_dir).join(PROFILE_STORE);

        let mut row = HashMap::new();
        row.insert("用户主页", target.to_string());
        row.insert("昵称", profile.nickname.clone());
        row.insert("身份认证", profile.account_cert.clone());
        row.insert("粉丝数", profile.followers_count.to_string());
        row.insert("排名认证", profile.rank_label.clone());

        if let Err(e) = sink::append_row(&path, PROFILE_COLUMNS, &row) {
            warn!("failed to persist profile for {}: {}", target, e);
        }
    }

    /// Video mode: paginated enumeration bounded by `max_videos`, with the
    /// per-item download, stats row and nested comment harvest.
    fn harvest_videos(
        &self,
        tab: &Arc<Tab>,
        target: &str,
        profile: &ProfileInfo,
        max_videos: usize,
    ) -> Result<LoopSummary, CrawlError> {
        let safe_nickname = sanitize_for_path(&profile.nickname);
        let user_dir =
            Path::new(&self.config.output_dir).join(format!("{}_video", safe_nickname));
        let video_dir = user_dir.join("videos");
        let comments_dir = user_dir.join("comments");
        let stats_path = user_dir.join(format!("{}_stats.csv", safe_nickname));

        fs::create_dir_all(&video_dir)?;
        fs::create_dir_all(&comments_dir)?;

        let waiter = ResponseWaiter::arm(Arc::clone(tab), VIDEO_LIST_PATTERN)?;
        let pager = self.pager_for(tab);
        browser::navigate(tab, target)?;

        let mut driver =
            BrowserPageDriver::new(waiter, pager, self.config.pacing.wait_timeout());

        let summary = harvest_pages(
            &mut driver,
            target,
            decode_video_page,
            Some(max_videos),
            |video| self.process_video(&video, &video_dir, &comments_dir, &stats_path),
        );

        if summary.capture_miss && summary.pages == 0 {
            warn!("no video list captured for {}", profile.nickname);
        } else if summary.items == 0 {
            info!("{} has no videos", profile.nickname);
        } else {
            info!(
                "harvested {} videos over {} pages for {}",
                summary.items, summary.pages, profile.nickname
            );
        }

        Ok(summary)
    }

    /// Per-video work. Every failure here is logged and skipped so the
    /// enclosing video loop keeps going.
    fn process_video(
        &self,
        video: &VideoRecord,
        video_dir: &Path,
        comments_dir: &Path,
        stats_path: &Path,
    ) {
        if video.play_url.is_empty() {
            warn!("video {} has no play URL; skipping download", video.video_id);
        } else if let Err(e) = self
            .downloader
            .save(&video.play_url, video_dir, &video.video_id)
        {
            warn!("download failed for video {}: {}", video.video_id, e);
        }

        if let Err(e) = sink::append_row(stats_path, STATS_COLUMNS, &stats_row(video)) {
            warn!("failed to persist stats for video {}: {}", video.video_id, e);
        }

        if let Err(e) = self.harvest_comments(&video.video_id, comments_dir) {
            warn!("comment harvest failed for video {}: {}", video.video_id, e);
        }
    }

    /// Comment mode: a nested paginated harvest on the video's own page,
    /// run in a fresh tab so the video-list interception stays armed.
    fn harvest_comments(
        &self,
        video_id: &str,
        comments_dir: &Path,
    ) -> Result<LoopSummary, CrawlError> {
        let csv_path = comments_dir.join(format!("{}_comments.csv", video_id));
        if let Err(e) = sink::ensure_store(&csv_path, COMMENT_COLUMNS) {
            warn!("failed to initialize comment store for {}: {}", video_id, e);
        }

        let tab = self.manager.new_tab()?;
        let result = self.harvest_comments_on_tab(&tab, video_id, &csv_path);

        if let Err(e) = tab.close(false) {
            debug!("failed to close comment tab for {}: {}", video_id, e);
        }

        result
    }

    fn harvest_comments_on_tab(
        &self,
        tab: &Arc<Tab>,
        video_id: &str,
        csv_path: &Path,
    ) -> Result<LoopSummary, CrawlError> {
        let waiter = ResponseWaiter::arm(Arc::clone(tab), COMMENT_LIST_PATTERN)?;
        let pager = self.pager_for(tab);

        let video_url = format!("https://www.douyin.com/video/{}", video_id);
        browser::navigate(tab, &video_url)?;

        let mut driver =
            BrowserPageDriver::new(waiter, pager, self.config.pacing.wait_timeout());

        let summary = harvest_pages(&mut driver, video_id, decode_comment_page, None, |comment| {
            if let Err(e) = sink::append_row(csv_path, COMMENT_COLUMNS, &comment_row(&comment)) {
                warn!("failed to persist comment for video {}: {}", video_id, e);
            }
        });

        info!(
            "harvested {} comments over {} pages for video {}",
            summary.items, summary.pages, video_id
        );
        Ok(summary)
    }

    fn pager_for(&self, tab: &Arc<Tab>) -> PageAdvancer {
        PageAdvancer::new(
            Arc::clone(tab),
            &self.config.page_sentinel,
            self.config.pacing.settle_delay(),
        )
    }
}

impl Drop for CrawlCoordinator {
    fn drop(&mut self) {
        // The browser process is killed when the manager drops right after.
        debug!("releasing browser instance");
    }
}

fn stats_row(video: &VideoRecord) -> HashMap<&'static str, String> {
    let mut row = HashMap::new();
    row.insert("视频ID", video.video_id.clone());
    row.insert("描述", video.desc.clone());
    row.insert("话题标签", video.tag.clone());
    row.insert("发布时间", video.create_time.clone());
    row.insert("视频链接", video.play_url.clone());
    row.insert("点赞量", video.digg_count.to_string());
    row.insert("转发量", video.share_count.to_string());
    row.insert("收藏量", video.collect_count.to_string());
    row.insert("评论量", video.comment_count.to_string());
    row.insert("推荐量", video.recommend_count.to_string());
    row.insert("时长", format_duration(video.duration));
    row
}

fn comment_row(comment: &CommentRecord) -> HashMap<&'static str, String> {
    let mut row = HashMap::new();
    row.insert("昵称", comment.nickname.clone());
    row.insert("地区", comment.ip_label.clone());
    row.insert("时间", comment.create_time.clone());
    row.insert("评论", comment.text.clone());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_row_covers_every_column() {
        let video = VideoRecord {
            video_id: "1".to_string(),
            desc: "d".to_string(),
            tag: "t".to_string(),
            create_time: "2024-01-01 00:00:00".to_string(),
            play_url: "https://v/a.mp4".to_string(),
            digg_count: 1,
            share_count: 2,
            collect_count: 3,
            comment_count: 4,
            recommend_count: 5,
            duration: Some(10.0),
        };
        let row = stats_row(&video);
        for col in STATS_COLUMNS {
            assert!(row.contains_key(col), "missing column {}", col);
        }
        assert_eq!(row["时长"], "10.00秒");
    }

    #[test]
    fn test_comment_row_covers_every_column() {
        let comment = CommentRecord {
            nickname: "n".to_string(),
            ip_label: "广东".to_string(),
            create_time: "无时间".to_string(),
            text: "无评论".to_string(),
        };
        let row = comment_row(&comment);
        for col in COMMENT_COLUMNS {
            assert!(row.contains_key(col), "missing column {}", col);
        }
    }
}
