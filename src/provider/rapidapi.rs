//! RapidAPI-backed provider client

use super::traits::ProviderClient;
use super::types::{DownloadLink, DownloadResponse, RawVideoInfo};
use crate::config::{ProviderConfig, RetryConfig};
use crate::error::{Error, ProviderError, Result};
use crate::retry::with_retry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DOWNLOAD_CONTEXT: &str = "Failed to request download";
const VIDEO_INFO_CONTEXT: &str = "Failed to fetch video info";

/// Client for the "YouTube video fast downloader" RapidAPI service
///
/// Every request carries the `x-rapidapi-key` and `x-rapidapi-host` headers.
/// Without an API key every call fails with [`ProviderError::NotConfigured`]
/// and nothing is sent.
#[derive(Clone, Debug)]
pub struct RapidApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    host: String,
    base_url: String,
    request_timeout: Duration,
    retry: RetryConfig,
}

impl RapidApiClient {
    /// Build a client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("vibe-dl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            host: config.host.clone(),
            base_url: config.base_url(),
            request_timeout: config.request_timeout,
            retry: config.retry.clone(),
        })
    }

    /// One GET request, decoded as JSON
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<T, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: Some(status.as_u16()),
                message: rejection_message(status, &body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.request_timeout)
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ProviderClient for RapidApiClient {
    async fn resolve_download(
        &self,
        source_id: &str,
        format_id: &str,
    ) -> std::result::Result<DownloadLink, ProviderError> {
        let path = format!("/download_video/{}", urlencoding::encode(source_id));
        let query = [("quality", format_id)];

        let response: DownloadResponse = with_retry(&self.retry, || self.get_json(&path, &query))
            .await
            .map_err(|e| with_context(e, DOWNLOAD_CONTEXT))?;

        match response.file {
            Some(file) if !file.trim().is_empty() => Ok(DownloadLink {
                file_url: file,
                note: response.comment,
            }),
            _ => Err(ProviderError::Malformed(match response.comment {
                Some(comment) => format!("download file not ready ({})", comment),
                None => "download file not ready".to_string(),
            })),
        }
    }

    async fn resolve_video_info(
        &self,
        source_id: &str,
    ) -> std::result::Result<RawVideoInfo, ProviderError> {
        let path = format!("/get-video-info/{}", urlencoding::encode(source_id));

        with_retry(&self.retry, || self.get_json(&path, &[]))
            .await
            .map_err(|e| with_context(e, VIDEO_INFO_CONTEXT))
    }

    fn name(&self) -> &str {
        "rapidapi"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Reason for a non-2xx answer: the body's `message` field, else the status reason
fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        })
}

/// Prefix the human-readable reason with the failed operation
fn with_context(error: ProviderError, context: &str) -> ProviderError {
    match error {
        ProviderError::Rejected { status, message } => ProviderError::Rejected {
            status,
            message: format!("{}: {}", context, message),
        },
        ProviderError::Transport(message) => {
            ProviderError::Transport(format!("{}: {}", context, message))
        }
        ProviderError::Malformed(message) => {
            ProviderError::Malformed(format!("{}: {}", context, message))
        }
        other => other,
    }
}
