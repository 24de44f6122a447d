//! Video metadata as served by `/api/video-info`

use crate::provider::{RawQuality, RawThumbnails, RawVideoInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Thumbnail image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Thumbnail {
    /// Image URL
    pub url: String,
    /// Width in pixels, if known
    pub width: Option<u32>,
    /// Height in pixels, if known
    pub height: Option<u32>,
}

/// Channel that published the video
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChannelInfo {
    /// Channel id
    pub id: String,
    /// Display name
    pub name: String,
    /// Channel page URL
    pub url: String,
    /// Verified badge
    pub verified: bool,
}

/// Audio-only stream
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AudioFormat {
    /// Format id to pass back as `format_id`
    pub format_id: String,
    /// Container extension (`mp4` or `webm`)
    pub ext: String,
    /// Bitrate label such as `128kbps`
    pub format_note: String,
    /// Average bitrate in kbps
    pub abr: Option<u64>,
    /// Size in bytes
    pub filesize: Option<u64>,
    /// Relative direct-download link
    pub download_url: String,
    /// Provider quality id, as the provider sent it
    pub quality_id: Value,
}

/// Video stream
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoFormat {
    /// Format id to pass back as `format_id`
    pub format_id: String,
    /// Container extension (`mp4` or `webm`)
    pub ext: String,
    /// Resolution label such as `720p`
    pub format_note: String,
    /// Width in pixels (not reported by the provider)
    pub width: Option<u32>,
    /// Height in pixels, parsed from the resolution label
    pub height: Option<u32>,
    /// Frame rate (not reported by the provider)
    pub fps: Option<u32>,
    /// Video codec sniffed from the MIME type
    pub vcodec: String,
    /// Audio codec; video streams carry no audio
    pub acodec: String,
    /// Size in bytes
    pub filesize: Option<u64>,
    /// Relative direct-download link
    pub download_url: String,
    /// Resolution label
    pub resolution: String,
    /// Provider quality id, as the provider sent it
    pub quality_id: Value,
    /// Bits per second
    pub bitrate: Option<u64>,
}

/// Video metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoInfo {
    /// Video id
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Duration in seconds
    pub duration: u64,
    /// View count
    pub view_count: u64,
    /// Human-readable publish date
    pub upload_date: String,
    /// Thumbnails, largest first when synthesized
    pub thumbnails: Vec<Thumbnail>,
    /// Publishing channel
    pub channel: ChannelInfo,
    /// Canonical watch URL
    pub canonical_url: String,
    /// Embed payload from the provider
    pub embed: Option<Value>,
    /// Audio-only streams, highest bitrate first
    pub audio_formats: Vec<AudioFormat>,
    /// Video streams, highest resolution first
    pub video_formats: Vec<VideoFormat>,
}

impl VideoInfo {
    /// Reshape provider metadata for video `id`
    ///
    /// Missing text fields get placeholders, unparseable counts become 0 and
    /// unparseable sizes become `None`. Thumbnails fall back to the standard
    /// image set when the provider sends none.
    pub fn from_provider(id: &str, raw: RawVideoInfo) -> Self {
        let thumbnails = match raw.thumbnail {
            Some(RawThumbnails::Many(list)) => list
                .into_iter()
                .map(|t| Thumbnail {
                    url: t.url,
                    width: t.width.filter(|w| *w > 0),
                    height: t.height.filter(|h| *h > 0),
                })
                .collect(),
            Some(RawThumbnails::One(t)) => vec![Thumbnail {
                url: t.url,
                width: t.width.filter(|w| *w > 0),
                height: t.height.filter(|h| *h > 0),
            }],
            Some(RawThumbnails::Other(_)) | None => thumbnails_for(id),
        };

        let qualities = raw.available_quality.unwrap_or_default();

        let mut audio_formats: Vec<AudioFormat> = qualities
            .iter()
            .filter(|q| q.kind.as_deref() == Some("audio"))
            .map(|q| audio_format(id, q))
            .collect();
        audio_formats.sort_by(|a, b| b.abr.unwrap_or(0).cmp(&a.abr.unwrap_or(0)));

        let mut video_formats: Vec<VideoFormat> = qualities
            .iter()
            .filter(|q| q.kind.as_deref() == Some("video"))
            .map(|q| video_format(id, q))
            .collect();
        video_formats.sort_by(|a, b| b.height.unwrap_or(0).cmp(&a.height.unwrap_or(0)));

        Self {
            id: id.to_string(),
            title: non_empty(raw.title).unwrap_or_else(|| "Unknown Title".to_string()),
            description: raw.description.unwrap_or_default(),
            duration: raw.length_seconds.as_ref().and_then(parse_count).unwrap_or(0),
            view_count: raw.view_count.as_ref().and_then(parse_count).unwrap_or(0),
            upload_date: raw.published_time_text.unwrap_or_default(),
            thumbnails,
            channel: ChannelInfo {
                id: raw.channel_id.unwrap_or_default(),
                name: non_empty(raw.author).unwrap_or_else(|| "Unknown Author".to_string()),
                url: raw.channel_url.unwrap_or_default(),
                verified: raw.channel_verified.unwrap_or(false),
            },
            canonical_url: non_empty(raw.canonical_url)
                .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", id)),
            embed: raw.embed.filter(|e| !e.is_null()),
            audio_formats,
            video_formats,
        }
    }
}

/// Standard thumbnail set for a video id, largest first
pub fn thumbnails_for(id: &str) -> Vec<Thumbnail> {
    [
        ("maxresdefault", 1280, 720),
        ("hqdefault", 480, 360),
        ("mqdefault", 320, 180),
        ("default", 120, 90),
    ]
    .into_iter()
    .map(|(name, width, height)| Thumbnail {
        url: format!("https://i.ytimg.com/vi/{}/{}.jpg", id, name),
        width: Some(width),
        height: Some(height),
    })
    .collect()
}

fn audio_format(video_id: &str, q: &RawQuality) -> AudioFormat {
    let format_id = q.id_string();
    let abr = q.bitrate.map(|b| (b / 1000.0).round().max(0.0) as u64);

    AudioFormat {
        ext: ext_for(q.mime.as_deref()).to_string(),
        format_note: match abr {
            Some(kbps) => format!("{}kbps", kbps),
            None => "unknown".to_string(),
        },
        abr,
        filesize: q.size.as_ref().and_then(parse_count).filter(|s| *s > 0),
        download_url: direct_download_path(video_id, &format_id),
        quality_id: q.id.clone(),
        format_id,
    }
}

fn video_format(video_id: &str, q: &RawQuality) -> VideoFormat {
    let format_id = q.id_string();
    let label = non_empty(q.quality.clone()).unwrap_or_else(|| "unknown".to_string());

    VideoFormat {
        ext: ext_for(q.mime.as_deref()).to_string(),
        format_note: label.clone(),
        width: None,
        height: q
            .quality
            .as_deref()
            .and_then(leading_int)
            .and_then(|h| u32::try_from(h).ok())
            .filter(|h| *h > 0),
        fps: None,
        vcodec: vcodec_for(q.mime.as_deref()).to_string(),
        acodec: "none".to_string(),
        filesize: q.size.as_ref().and_then(parse_count).filter(|s| *s > 0),
        download_url: direct_download_path(video_id, &format_id),
        resolution: label,
        quality_id: q.id.clone(),
        bitrate: q.bitrate.filter(|b| *b > 0.0).map(|b| b.round() as u64),
        format_id,
    }
}

fn direct_download_path(video_id: &str, format_id: &str) -> String {
    format!("/api/direct-download/{}/{}", video_id, format_id)
}

fn ext_for(mime: Option<&str>) -> &'static str {
    match mime {
        Some(m) if m.contains("mp4") => "mp4",
        _ => "webm",
    }
}

fn vcodec_for(mime: Option<&str>) -> &'static str {
    let mime = mime.unwrap_or_default();
    if mime.contains("av01") {
        "av01"
    } else if mime.contains("avc1") {
        "avc1"
    } else if mime.contains("vp9") {
        "vp9"
    } else {
        "unknown"
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Lenient non-negative count from a JSON number or numeric-prefixed string
fn parse_count(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_int(s),
        _ => None,
    }?;
    u64::try_from(n).ok()
}

/// Integer prefix of `s` after leading whitespace (`"720p"` → 720)
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
