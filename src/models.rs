use serde::{Deserialize, Serialize};

/// Creator profile metadata, captured once per target from the first
/// intercepted profile response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub nickname: String,
    pub account_cert: String,
    pub followers_count: u64,
    pub rank_label: String,
}

/// One video entry from a video-list page. Immutable after extraction.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub desc: String,
    pub tag: String,
    pub create_time: String,
    pub play_url: String,
    pub digg_count: u64,
    pub share_count: u64,
    pub collect_count: u64,
    pub comment_count: u64,
    pub recommend_count: u64,
    /// Duration in seconds, when the payload carries one.
    pub duration: Option<f64>,
}

/// One comment from a comment-list page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub nickname: String,
    pub ip_label: String,
    pub create_time: String,
    pub text: String,
}

/// Decoded page of a paginated response: the extracted items plus the
/// server's own has-more flag. The flag is authoritative only for the
/// response it came from.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}
