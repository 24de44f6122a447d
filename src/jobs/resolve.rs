//! Synchronous provider lookups that bypass the job store.

use crate::error::{ProviderError, Result};
use crate::provider::DownloadLink;
use crate::video::VideoInfo;

use super::JobTracker;

impl JobTracker {
    /// Fetch and reshape metadata for `source_id`
    pub async fn video_info(&self, source_id: &str) -> Result<VideoInfo> {
        let timeout = self.config.provider.resolve_timeout;
        let raw = tokio::time::timeout(timeout, self.provider.resolve_video_info(source_id))
            .await
            .map_err(|_| ProviderError::Timeout(timeout))?
            .inspect_err(|e| {
                tracing::warn!(source_id = %source_id, error = %e, "Video info lookup failed");
            })?;

        Ok(VideoInfo::from_provider(source_id, raw))
    }

    /// Resolve a file location right away, without creating a job
    ///
    /// Subject to the same deadline and fault handling as background
    /// resolution.
    pub async fn direct_download(&self, source_id: &str, format_id: &str) -> Result<DownloadLink> {
        let link = self
            .dispatcher
            .resolve(source_id, format_id)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    source_id = %source_id,
                    format_id = %format_id,
                    error = %e,
                    "Direct download resolution failed"
                );
            })?;
        Ok(link)
    }
}
