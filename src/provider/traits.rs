//! Provider client trait

use super::types::{DownloadLink, RawVideoInfo};
use crate::error::ProviderError;
use async_trait::async_trait;

/// Resolves video metadata and download file locations
///
/// Implementations are shared between every job's background task and the
/// synchronous request path, so they must be `Send + Sync` and must not hold
/// locks across calls. Latency is unbounded from the caller's point of view;
/// the dispatcher applies its own timeout.
///
/// # Examples
///
/// ```no_run
/// use vibe_dl::config::ProviderConfig;
/// use vibe_dl::provider::{ProviderClient, RapidApiClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RapidApiClient::new(&ProviderConfig::default())?;
/// let link = client.resolve_download("dQw4w9WgXcQ", "137").await?;
/// println!("file: {}", link.file_url);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Resolve the file location for `source_id` in format `format_id`
    async fn resolve_download(
        &self,
        source_id: &str,
        format_id: &str,
    ) -> Result<DownloadLink, ProviderError>;

    /// Fetch raw metadata for `source_id`
    async fn resolve_video_info(&self, source_id: &str) -> Result<RawVideoInfo, ProviderError>;

    /// Short provider name used in logs and the health endpoint
    fn name(&self) -> &str;

    /// Whether the client has the credentials it needs
    fn is_configured(&self) -> bool {
        true
    }
}
