//! Video URL parsing

use regex::Regex;
use std::sync::LazyLock;

/// Watch, embed, `/v/`, `/e/`, nested channel paths and `youtu.be` short links
static VIDEO_ID_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
});

/// Extract the 11-character video id from a video URL
///
/// Returns `None` when the URL is not a recognised video link.
///
/// # Examples
///
/// ```
/// use vibe_dl::video::extract_video_id;
///
/// assert_eq!(
///     extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
///     Some("dQw4w9WgXcQ")
/// );
/// assert_eq!(extract_video_id("https://example.com/video"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = VIDEO_ID_RE.as_ref().ok()?;
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `url` points at a recognisable video
pub fn is_valid_url(url: &str) -> bool {
    extract_video_id(url).is_some()
}
