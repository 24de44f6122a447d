//! Error types for vibe-dl
//!
//! This module provides:
//! - The crate-wide [`Error`] type and [`Result`] alias
//! - [`ProviderError`], the failure taxonomy of the upstream provider API
//! - HTTP status code mapping ([`ToHttpStatus`]) and the JSON error body ([`ApiError`])
//!
//! Failures that happen after a job was created never surface here: the
//! dispatcher records them on the job itself (`state = failed`, `error = ...`).

use crate::types::{JobId, JobState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for vibe-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vibe-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "JOB_TTL_SECS")
        key: Option<String>,
    },

    /// Unknown or expired job id
    ///
    /// Carries the id exactly as the caller supplied it, so malformed ids and
    /// reaped ids are reported identically.
    #[error("download {0} not found")]
    JobNotFound(String),

    /// Job exists but has not reached `Ready`
    #[error("download {id} is not ready (state: {state})")]
    NotReady {
        /// The job that was queried
        id: JobId,
        /// Its current state
        state: JobState,
    },

    /// Required request parameter absent
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// URL does not point at a recognisable video
    #[error("invalid video URL: {0}")]
    InvalidUrl(String),

    /// Upstream provider failure on a synchronous path
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new downloads")]
    ShuttingDown,

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Failure reported by (or while talking to) the provider API
///
/// Cloneable so the same failure can be both recorded on a job and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No API key configured for the provider
    #[error("provider API key is not configured")]
    NotConfigured,

    /// Provider answered with an error
    #[error("{message}")]
    Rejected {
        /// HTTP status, when the rejection came from an HTTP response
        status: Option<u16>,
        /// Human-readable reason
        message: String,
    },

    /// No answer within the allotted time
    #[error("provider did not respond within {0:?}")]
    Timeout(Duration),

    /// Connection-level failure
    #[error("provider request failed: {0}")]
    Transport(String),

    /// Answer could not be understood (bad JSON, missing file location, ...)
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// Unexpected fault inside the resolution task
    #[error("internal fault during resolution: {0}")]
    InternalFault(String),
}

impl ProviderError {
    /// Rejection without an HTTP status
    pub fn rejected(message: impl Into<String>) -> Self {
        ProviderError::Rejected {
            status: None,
            message: message.into(),
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "job_not_found",
///     "message": "download 6f1c... not found",
///     "details": {
///       "download_id": "6f1c..."
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "job_not_found", "invalid_url")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::MissingParameter(_) => 400,
            Error::InvalidUrl(_) => 400,

            // 404 Not Found
            Error::JobNotFound(_) => 404,

            // 409 Conflict - job exists but is in the wrong state
            Error::NotReady { .. } => 409,

            // 5xx - upstream provider
            Error::Provider(ProviderError::NotConfigured) => 503,
            Error::Provider(ProviderError::Timeout(_)) => 504,
            Error::Provider(_) => 502,

            // 500 Internal Server Error - Server-side issues
            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::JobNotFound(_) => "job_not_found",
            Error::NotReady { .. } => "not_ready",
            Error::MissingParameter(_) => "missing_parameter",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Provider(e) => match e {
                ProviderError::NotConfigured => "provider_not_configured",
                ProviderError::Rejected { .. } => "provider_rejected",
                ProviderError::Timeout(_) => "provider_timeout",
                ProviderError::Transport(_) => "provider_unreachable",
                ProviderError::Malformed(_) => "provider_malformed_response",
                ProviderError::InternalFault(_) => "internal_fault",
            },
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::ShuttingDown => "shutting_down",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::JobNotFound(id) => Some(serde_json::json!({
                "download_id": id,
            })),
            Error::NotReady { id, state } => Some(serde_json::json!({
                "download_id": id,
                "state": state,
            })),
            Error::MissingParameter(name) => Some(serde_json::json!({
                "parameter": name,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Provider(ProviderError::Rejected {
                status: Some(status),
                ..
            }) => Some(serde_json::json!({
                "provider_status": status,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// (Error, expected status, expected code) for every arm in ToHttpStatus.
    fn all_error_variants() -> Vec<(Error, u16, &'static str)> {
        vec![
            (
                Error::Config {
                    message: "bad value".into(),
                    key: Some("JOB_TTL_SECS".into()),
                },
                500,
                "config_error",
            ),
            (Error::JobNotFound("abc".into()), 404, "job_not_found"),
            (
                Error::NotReady {
                    id: JobId::new(),
                    state: JobState::AwaitingProvider,
                },
                409,
                "not_ready",
            ),
            (
                Error::MissingParameter("url".into()),
                400,
                "missing_parameter",
            ),
            (
                Error::InvalidUrl("https://example.com".into()),
                400,
                "invalid_url",
            ),
            (
                Error::Provider(ProviderError::NotConfigured),
                503,
                "provider_not_configured",
            ),
            (
                Error::Provider(ProviderError::rejected("quota exceeded")),
                502,
                "provider_rejected",
            ),
            (
                Error::Provider(ProviderError::Timeout(Duration::from_secs(30))),
                504,
                "provider_timeout",
            ),
            (
                Error::Provider(ProviderError::Transport("connection refused".into())),
                502,
                "provider_unreachable",
            ),
            (
                Error::Provider(ProviderError::Malformed("no file".into())),
                502,
                "provider_malformed_response",
            ),
            (
                Error::Provider(ProviderError::InternalFault("panicked".into())),
                502,
                "internal_fault",
            ),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
                500,
                "io_error",
            ),
            (
                Error::ApiServerError("bind failed".into()),
                500,
                "api_server_error",
            ),
            (Error::ShuttingDown, 503, "shutting_down"),
            (Error::Other("unknown".into()), 500, "internal_error"),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_status_code() {
        for (error, expected_status, _) in all_error_variants() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "wrong status for {error:?}"
            );
        }
    }

    #[test]
    fn every_variant_maps_to_expected_error_code() {
        for (error, _, expected_code) in all_error_variants() {
            assert_eq!(error.error_code(), expected_code, "wrong code for {error:?}");
        }
    }

    #[test]
    fn rejected_displays_bare_message() {
        let error = ProviderError::rejected("quota exceeded");
        assert_eq!(error.to_string(), "quota exceeded");
    }

    #[test]
    fn timeout_displays_seconds() {
        let error = ProviderError::Timeout(Duration::from_secs(120));
        assert_eq!(error.to_string(), "provider did not respond within 120s");
    }

    #[test]
    fn api_error_from_job_not_found_has_download_id() {
        let api: ApiError = Error::JobNotFound("unknown-id".into()).into();
        assert_eq!(api.error.code, "job_not_found");
        assert_eq!(api.error.details.unwrap()["download_id"], "unknown-id");
    }

    #[test]
    fn api_error_from_not_ready_has_state() {
        let id = JobId::new();
        let api: ApiError = Error::NotReady {
            id,
            state: JobState::Dispatched,
        }
        .into();
        let details = api.error.details.unwrap();
        assert_eq!(details["download_id"], id.to_string());
        assert_eq!(details["state"], "dispatched");
    }

    #[test]
    fn api_error_from_rejection_with_status_has_provider_status() {
        let api: ApiError = Error::Provider(ProviderError::Rejected {
            status: Some(429),
            message: "Failed to request download: Too many requests".into(),
        })
        .into();
        assert_eq!(api.error.details.unwrap()["provider_status"], 429);
    }

    #[test]
    fn api_error_from_shutting_down_has_no_details() {
        let api: ApiError = Error::ShuttingDown.into();
        assert!(api.error.details.is_none());
    }

    #[test]
    fn api_error_without_details_omits_details_in_json() {
        let api = ApiError::new("internal_error", "bad input");
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["error"]["code"], "internal_error");
        assert!(json["error"].get("details").is_none());
    }

    #[test]
    fn api_error_message_matches_error_display() {
        let error = Error::MissingParameter("url".into());
        let display = error.to_string();
        let api: ApiError = error.into();
        assert_eq!(api.error.message, display);
    }
}
