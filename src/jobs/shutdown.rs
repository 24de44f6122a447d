//! Shutdown coordination.

use crate::error::Result;
use crate::types::Event;
use std::sync::atomic::Ordering;

use super::JobTracker;

impl JobTracker {
    /// Gracefully shut down the tracker
    ///
    /// 1. Stops accepting submissions
    /// 2. Stops the reaper
    /// 3. Waits up to `jobs.shutdown_timeout` for in-flight resolutions
    /// 4. Emits [`Event::Shutdown`]
    ///
    /// Provider calls still running after the timeout are not aborted.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.accepting_new.store(false, Ordering::SeqCst);
        self.shutdown_token.cancel();
        tracing::info!("Stopped accepting new downloads");

        let in_flight = self.dispatcher.in_flight();
        if self.dispatcher.drain(self.config.jobs.shutdown_timeout).await {
            tracing::info!(in_flight, "All in-flight resolutions finished");
        } else {
            tracing::warn!(
                remaining = self.dispatcher.in_flight(),
                "Timeout waiting for in-flight resolutions, proceeding with shutdown"
            );
        }

        self.emit_event(Event::Shutdown);
        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Whether new submissions are accepted
    pub fn is_accepting(&self) -> bool {
        self.accepting_new.load(Ordering::SeqCst)
    }
}
