//! Video metadata handlers.

use super::{VideoInfoQuery, video_id_from};
use crate::api::AppState;
use crate::error::Result;
use crate::video::VideoInfo;
use axum::{
    Json,
    extract::{Query, State},
};

/// GET /video-info - Video metadata and available formats
#[utoipa::path(
    get,
    path = "/api/video-info",
    tag = "video",
    params(VideoInfoQuery),
    responses(
        (status = 200, description = "Video metadata", body = VideoInfo),
        (status = 400, description = "Missing or invalid URL", body = crate::error::ApiError),
        (status = 502, description = "Provider failed", body = crate::error::ApiError),
        (status = 504, description = "Provider timed out", body = crate::error::ApiError)
    )
)]
pub async fn video_info(
    State(state): State<AppState>,
    Query(query): Query<VideoInfoQuery>,
) -> Result<Json<VideoInfo>> {
    let video_id = video_id_from(query.url.as_deref())?;
    let info = state.tracker.video_info(&video_id).await?;
    Ok(Json(info))
}
