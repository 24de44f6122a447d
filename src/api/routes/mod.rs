//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`downloads`] - Download jobs, file reclaim and direct downloads
//! - [`video`] - Video metadata
//! - [`system`] - Health, events, OpenAPI

use crate::error::{Error, Result};
use crate::types::{Job, JobState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod downloads;
mod system;
mod video;

pub use downloads::*;
pub use system::*;
pub use video::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /video-info
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VideoInfoQuery {
    /// YouTube video URL
    pub url: Option<String>,
}

/// Query parameters for GET /download
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// YouTube video URL
    pub url: Option<String>,
    /// Provider quality id to download
    pub format_id: Option<String>,
}

/// Query parameters for GET /direct-download/:video_id/:format_id
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectDownloadQuery {
    /// Suggested filename for the saved file
    pub filename: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for GET /download
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DownloadStarted {
    /// Job ID to poll
    pub download_id: String,
    /// Always `created`
    pub status: JobState,
    /// Next step hint
    pub message: String,
}

/// Response for GET /download-status/:id
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DownloadStatus {
    /// Job ID
    pub download_id: String,
    /// Current state
    pub status: JobState,
    /// Video identifier
    pub source_id: String,
    /// Requested format
    pub format_id: String,
    /// File location (ready jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Provider remark (ready jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Failure description (failed jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Job> for DownloadStatus {
    fn from(job: Job) -> Self {
        Self {
            download_id: job.id.to_string(),
            status: job.state,
            source_id: job.source_id,
            format_id: job.format_id,
            download_url: job.download_url,
            note: job.note,
            error: job.error,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: String,
    /// Crate version
    pub version: String,
    /// Provider name
    pub provider: String,
    /// Whether the provider has an API key
    pub provider_configured: bool,
}

/// Pull the video id out of a required `url` query parameter
fn video_id_from(url: Option<&str>) -> Result<String> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::MissingParameter("url".to_string()))?;

    crate::video::extract_video_id(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))
}
