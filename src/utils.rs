/// Utility functions
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video id pattern is valid")
});

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Rewrite a video-hosting URL into its embeddable form.
///
/// Only `youtube.com` and `youtu.be` links are considered, and only when the
/// extracted identifier is exactly 11 characters; everything else is
/// returned unchanged.
pub fn embed_url(url: &str) -> String {
    if !(url.contains("youtube.com") || url.contains("youtu.be")) {
        return url.to_string();
    }

    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(2))
        .map(|id| id.as_str())
        .filter(|id| id.chars().count() == 11)
        .map(|id| format!("{EMBED_BASE}{id}"))
        .unwrap_or_else(|| url.to_string())
}

/// Calendar-date portion of an ISO timestamp (everything before `T`)
pub fn date_portion(timestamp: &str) -> Option<NaiveDate> {
    let day = timestamp.trim().split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Pick a non-blank string
pub fn non_blank(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
