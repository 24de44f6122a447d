//! HTTP error response handling for the API
//!
//! Converts domain errors to HTTP responses with the status code from
//! [`ToHttpStatus`] and an [`ApiError`] JSON body.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::warn!(status = status_code.as_u16(), error = %self, "Request failed");
        }

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

/// Bare [`ApiError`]s carry no status; they are served as 500
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::types::{JobId, JobState};

    async fn body_of(response: Response) -> ApiError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn job_not_found_is_404_with_download_id() {
        let response = Error::JobNotFound("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let api_error = body_of(response).await;
        assert_eq!(api_error.error.code, "job_not_found");
        assert_eq!(api_error.error.details.unwrap()["download_id"], "abc");
    }

    #[tokio::test]
    async fn not_ready_is_409_with_state() {
        let id = JobId::new();
        let response = Error::NotReady {
            id,
            state: JobState::AwaitingProvider,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let api_error = body_of(response).await;
        assert_eq!(api_error.error.code, "not_ready");
        let details = api_error.error.details.unwrap();
        assert_eq!(details["download_id"], id.to_string());
        assert_eq!(details["state"], "awaiting_provider");
    }

    #[tokio::test]
    async fn provider_rejection_is_502_with_upstream_status() {
        let response = Error::Provider(ProviderError::Rejected {
            status: Some(403),
            message: "Failed to request download: quota exceeded".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let api_error = body_of(response).await;
        assert_eq!(api_error.error.code, "provider_rejected");
        assert_eq!(
            api_error.error.message,
            "Failed to request download: quota exceeded"
        );
        assert_eq!(api_error.error.details.unwrap()["provider_status"], 403);
    }

    #[tokio::test]
    async fn bare_api_error_is_500() {
        let response = ApiError::new("internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.error.message, "boom");
    }
}
