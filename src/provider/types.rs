//! Provider wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved file location for a download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadLink {
    /// Location the end client fetches the file from
    pub file_url: String,
    /// Free-form provider remark (e.g. "file is being prepared")
    pub note: Option<String>,
}

/// Body of `GET /download_video/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct DownloadResponse {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Raw video metadata as returned by the provider
///
/// Numeric fields arrive as strings or numbers depending on the upstream
/// source, so they are kept as untyped JSON values and parsed leniently by
/// [`crate::video::VideoInfo::from_provider`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoInfo {
    /// Video title
    pub title: Option<String>,
    /// Video description
    pub description: Option<String>,
    /// Duration in seconds
    pub length_seconds: Option<Value>,
    /// View count
    pub view_count: Option<Value>,
    /// Human-readable publish date ("3 years ago")
    pub published_time_text: Option<String>,
    /// Thumbnail list or single thumbnail
    pub thumbnail: Option<RawThumbnails>,
    /// Channel id
    pub channel_id: Option<String>,
    /// Channel display name
    pub author: Option<String>,
    /// Channel page
    pub channel_url: Option<String>,
    /// Verified badge
    pub channel_verified: Option<bool>,
    /// Canonical watch URL
    pub canonical_url: Option<String>,
    /// Embed payload, passed through untouched
    pub embed: Option<Value>,
    /// Downloadable audio and video streams
    pub available_quality: Option<Vec<RawQuality>>,
}

/// Thumbnail field: a list, a single object, or something unusable
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawThumbnails {
    /// List of thumbnails
    Many(Vec<RawThumbnail>),
    /// Single thumbnail object
    One(RawThumbnail),
    /// Anything else; ignored
    Other(Value),
}

/// Provider thumbnail entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawThumbnail {
    /// Image URL
    pub url: String,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
}

/// One entry of `availableQuality`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawQuality {
    /// Provider quality id (number or string)
    pub id: Value,
    /// `"audio"` or `"video"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Video resolution label such as `"720p"`
    #[serde(default)]
    pub quality: Option<String>,
    /// MIME type including codecs, e.g. `video/mp4; codecs="avc1.4d401f"`
    #[serde(default)]
    pub mime: Option<String>,
    /// Bits per second
    #[serde(default)]
    pub bitrate: Option<f64>,
    /// File size in bytes (number or string)
    #[serde(default)]
    pub size: Option<Value>,
}

impl RawQuality {
    /// Quality id rendered the way it appears in URLs
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_video_info_accepts_string_and_numeric_fields() {
        let raw: RawVideoInfo = serde_json::from_value(json!({
            "title": "Never Gonna Give You Up",
            "lengthSeconds": "212",
            "viewCount": 1_500_000_000u64,
            "channelVerified": true,
        }))
        .unwrap();

        assert_eq!(raw.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(raw.length_seconds, Some(json!("212")));
        assert_eq!(raw.view_count, Some(json!(1_500_000_000u64)));
        assert_eq!(raw.channel_verified, Some(true));
        assert!(raw.available_quality.is_none());
    }

    #[test]
    fn thumbnails_accept_list_object_and_garbage() {
        let many: RawThumbnails =
            serde_json::from_value(json!([{ "url": "a.jpg", "width": 1, "height": 2 }])).unwrap();
        assert!(matches!(many, RawThumbnails::Many(ref v) if v.len() == 1));

        let one: RawThumbnails = serde_json::from_value(json!({ "url": "b.jpg" })).unwrap();
        assert!(matches!(one, RawThumbnails::One(ref t) if t.url == "b.jpg"));

        let other: RawThumbnails = serde_json::from_value(json!("c.jpg")).unwrap();
        assert!(matches!(other, RawThumbnails::Other(_)));
    }

    #[test]
    fn quality_id_renders_numbers_without_quotes() {
        let numeric: RawQuality =
            serde_json::from_value(json!({ "id": 137, "type": "video" })).unwrap();
        assert_eq!(numeric.id_string(), "137");
        assert_eq!(numeric.kind.as_deref(), Some("video"));

        let text: RawQuality = serde_json::from_value(json!({ "id": "251" })).unwrap();
        assert_eq!(text.id_string(), "251");
    }
}
