//! Download job handlers.

use super::{
    DirectDownloadQuery, DownloadQuery, DownloadStarted, DownloadStatus, video_id_from,
};
use crate::api::AppState;
use crate::error::{Error, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
};

/// GET /download - Start preparing a download
#[utoipa::path(
    get,
    path = "/api/download",
    tag = "downloads",
    params(DownloadQuery),
    responses(
        (status = 200, description = "Job created", body = DownloadStarted),
        (status = 400, description = "Missing parameter or invalid URL", body = crate::error::ApiError),
        (status = 503, description = "Shutting down", body = crate::error::ApiError)
    )
)]
pub async fn start_download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<DownloadStarted>> {
    let video_id = video_id_from(query.url.as_deref())?;
    let format_id = query
        .format_id
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| Error::MissingParameter("format_id".to_string()))?;

    let job = state.tracker.submit(&video_id, &format_id)?;

    Ok(Json(DownloadStarted {
        download_id: job.id.to_string(),
        status: job.state,
        message: "Download preparation started. Check status using the /api/download-status endpoint."
            .to_string(),
    }))
}

/// GET /download-status/:id - Job status
#[utoipa::path(
    get,
    path = "/api/download-status/{id}",
    tag = "downloads",
    params(
        ("id" = String, Path, description = "Download ID")
    ),
    responses(
        (status = 200, description = "Current job state", body = DownloadStatus),
        (status = 404, description = "Unknown or expired download", body = crate::error::ApiError)
    )
)]
pub async fn download_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DownloadStatus>> {
    let job = state.tracker.status(&id)?;
    Ok(Json(job.into()))
}

/// GET /get-file/:id - Redirect to the resolved file
#[utoipa::path(
    get,
    path = "/api/get-file/{id}",
    tag = "downloads",
    params(
        ("id" = String, Path, description = "Download ID")
    ),
    responses(
        (status = 307, description = "Redirect to the file location"),
        (status = 404, description = "Unknown or expired download", body = crate::error::ApiError),
        (status = 409, description = "Download not ready", body = crate::error::ApiError)
    )
)]
pub async fn get_file(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let url = state.tracker.download_url(&id)?;
    Ok(Redirect::temporary(&url))
}

/// GET /direct-download/:video_id/:format_id - Resolve and redirect in one call
#[utoipa::path(
    get,
    path = "/api/direct-download/{video_id}/{format_id}",
    tag = "downloads",
    params(
        ("video_id" = String, Path, description = "Video ID"),
        ("format_id" = String, Path, description = "Provider quality id"),
        DirectDownloadQuery
    ),
    responses(
        (status = 307, description = "Redirect to the file location"),
        (status = 502, description = "Provider failed or returned no file", body = crate::error::ApiError),
        (status = 504, description = "Provider timed out", body = crate::error::ApiError)
    )
)]
pub async fn direct_download(
    State(state): State<AppState>,
    Path((video_id, format_id)): Path<(String, String)>,
    Query(query): Query<DirectDownloadQuery>,
) -> Result<Response> {
    let link = state.tracker.direct_download(&video_id, &format_id).await?;
    let mut response = Redirect::temporary(&link.file_url).into_response();

    if let Some(disposition) = query.filename.as_deref().and_then(content_disposition) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok(response)
}

/// `attachment` disposition for `filename`, percent-encoded when not plain ASCII
fn content_disposition(filename: &str) -> Option<HeaderValue> {
    let filename = filename.trim();
    if filename.is_empty() {
        return None;
    }

    let plain = filename
        .chars()
        .all(|c| c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\'));

    let value = if plain {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    };

    HeaderValue::from_str(&value).ok()
}
