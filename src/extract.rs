//! Mode-specific decoders for intercepted JSON pages.
//!
//! Pagination trusts the server's own `has_more` flag, and that trust lives
//! entirely in this module: the harvesting loop only sees the decoded
//! [`Page`], so an alternate completion heuristic (e.g. empty-page
//! detection) could be substituted here without touching the loop.

use crate::helpers::format_timestamp;
use crate::models::{CommentRecord, Page, ProfileInfo, VideoRecord};
use serde_json::Value;

const UNKNOWN: &str = "未知";
const UNKNOWN_CREATOR: &str = "未知博主";
const NO_DESC: &str = "无描述";
const NO_TAG: &str = "无标签";
const NO_TIME: &str = "无时间";
const NO_COMMENT: &str = "无评论";
const UNKNOWN_REGION: &str = "未知地区";

/// Douyin returns `has_more` as 1/0; tolerate booleans as well. An absent
/// flag means no further page.
fn truthy(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0 || n.as_f64().unwrap_or(0.0) != 0.0,
        _ => false,
    }
}

fn str_or(v: &Value, key: &str, default: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn count(v: &Value, key: &str) -> u64 {
    v.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn time_or(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_i64)
        .filter(|t| *t != 0)
        .and_then(format_timestamp)
        .unwrap_or_else(|| NO_TIME.to_string())
}

/// Decode a `/aweme/v1/web/user/profile/` body. Returns `None` when the
/// response carries no user object, which callers treat the same as a
/// capture failure for this target.
pub fn decode_profile(body: &Value) -> Option<ProfileInfo> {
    let user = body.get("user")?;
    if !user.as_object().is_some_and(|o| !o.is_empty()) {
        return None;
    }

    // account_cert_info is itself a JSON-encoded string.
    let account_cert = user
        .get("account_cert_info")
        .and_then(Value::as_str)
        .and_then(|s| serde_json::from_str::<Value>(s).ok())
        .and_then(|v| v.get("label_text").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let rank_label = user
        .get("profile_rank_label")
        .and_then(|v| v.get("text"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string();

    Some(ProfileInfo {
        nickname: str_or(user, "nickname", UNKNOWN_CREATOR),
        account_cert,
        followers_count: count(user, "mplatform_followers_count"),
        rank_label,
    })
}

/// Decode an `/aweme/v1/web/aweme/post/` body into video records plus the
/// has-more flag.
pub fn decode_video_page(body: &Value) -> Page<VideoRecord> {
    let items = body
        .get("aweme_list")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(decode_video_item).collect())
        .unwrap_or_default();

    Page {
        items,
        has_more: truthy(body.get("has_more")),
    }
}

fn decode_video_item(item: &Value) -> VideoRecord {
    let play_url = item
        .get("video")
        .and_then(|v| v.get("play_addr"))
        .and_then(|v| v.get("url_list"))
        .and_then(Value::as_array)
        .and_then(|l| l.first())
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let duration = item
        .get("video")
        .and_then(|v| v.get("big_thumbs"))
        .and_then(Value::as_array)
        .and_then(|l| l.first())
        .and_then(|t| t.get("duration"))
        .and_then(Value::as_f64);

    let stats = item.get("statistics").cloned().unwrap_or(Value::Null);

    VideoRecord {
        video_id: str_or(item, "aweme_id", UNKNOWN),
        desc: str_or(item, "desc", NO_DESC),
        tag: str_or(item, "caption", NO_TAG),
        create_time: time_or(item, "create_time"),
        play_url,
        digg_count: count(&stats, "digg_count"),
        share_count: count(&stats, "share_count"),
        collect_count: count(&stats, "collect_count"),
        comment_count: count(&stats, "comment_count"),
        recommend_count: count(&stats, "recommend_count"),
        duration,
    }
}

/// Decode an `aweme/v1/web/comment/list/` body into comment records plus the
/// has-more flag.
pub fn decode_comment_page(body: &Value) -> Page<CommentRecord> {
    let items = body
        .get("comments")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(decode_comment_item).collect())
        .unwrap_or_default();

    Page {
        items,
        has_more: truthy(body.get("has_more")),
    }
}

fn decode_comment_item(item: &Value) -> CommentRecord {
    let nickname = item
        .get("user")
        .map(|u| str_or(u, "nickname", UNKNOWN))
        .unwrap_or_else(|| UNKNOWN.to_string());

    CommentRecord {
        nickname,
        ip_label: str_or(item, "ip_label", UNKNOWN_REGION),
        create_time: time_or(item, "create_time"),
        text: str_or(item, "text", NO_COMMENT),
    }
}
