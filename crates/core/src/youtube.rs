//! YouTube video-ID extraction for track and reference links.
//!
//! Accepts the URL shapes people paste into the dashboard (`watch?v=`,
//! `youtu.be/`, `embed/`, `shorts/`, `v/`, `live/`, with or without scheme and
//! `www.`/`m.`/`music.` prefixes) and a bare 11-character video ID.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m|music)\.)?(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/|shorts/|v/|live/)|youtube-nocookie\.com/embed/|youtu\.be/)([a-z0-9_-]{11})(?:[?&#/].*)?$",
    )
    .expect("valid regex")
});

static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"));

/// Extract the video ID from a YouTube URL or bare ID.
///
/// Returns `None` for anything that is not recognisably a YouTube video.
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if BARE_ID_RE.is_match(trimmed) {
        return Some(trimmed.to_string());
    }
    URL_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
