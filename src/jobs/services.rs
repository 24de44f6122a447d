//! Background service starters.

use super::JobTracker;
use super::reaper::Reaper;
use crate::error::Result;

impl JobTracker {
    /// Start the reaper background task
    ///
    /// The reaper sweeps every `jobs.sweep_interval` and stops when
    /// [`JobTracker::shutdown`] runs.
    pub fn start_reaper(&self) -> Result<tokio::task::JoinHandle<()>> {
        let reaper = Reaper::new(
            self.store.clone(),
            self.event_tx.clone(),
            self.config.jobs.ttl,
            self.config.jobs.sweep_interval,
            self.shutdown_token.child_token(),
        )?;

        let handle = tokio::spawn(reaper.run());
        tracing::info!("Reaper background task started");
        Ok(handle)
    }
}
