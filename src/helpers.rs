//! Small utility functions shared across the crawler:
//! - filesystem-safe folder names derived from creator nicknames
//! - timestamp and duration formatting for CSV rows

use chrono::{Local, TimeZone};

/// Characters that are illegal in path segments on common filesystems.
const ILLEGAL_PATH_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace characters illegal in path segments with an underscore so a
/// creator nickname can be used as a folder name.
pub fn sanitize_for_path(name: &str) -> String {
    name.replace(ILLEGAL_PATH_CHARS, "_")
}

/// Format a Unix timestamp (seconds) as a local `YYYY-MM-DD HH:MM:SS` string.
/// Returns `None` for timestamps the local calendar cannot represent.
pub fn format_timestamp(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Format a video duration in seconds as `{:.2}秒`, or `未知时长` when the
/// payload carried no duration.
pub fn format_duration(duration: Option<f64>) -> String {
    match duration {
        Some(d) => format!("{:.2}秒", d),
        None => "未知时长".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_every_illegal_char() {
        let dirty = r#"a/b\c:d*e?f"g<h>i|j"#;
        assert_eq!(sanitize_for_path(dirty), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitize_keeps_clean_names() {
        assert_eq!(sanitize_for_path("美食日记"), "美食日记");
        assert_eq!(sanitize_for_path("plain name"), "plain name");
    }

    #[test]
    fn test_format_timestamp() {
        let formatted = format_timestamp(0).unwrap();
        // Exact value depends on the local zone; the shape does not.
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[13..14], ":");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(12.5)), "12.50秒");
        assert_eq!(format_duration(None), "未知时长");
    }
}
