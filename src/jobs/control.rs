//! Job submission, status queries and file reclaim.

use crate::error::{Error, Result};
use crate::types::{Event, Job, JobId, JobState};
use std::sync::atomic::Ordering;

use super::JobTracker;

impl JobTracker {
    /// Register a download job and start resolving it in the background
    ///
    /// Returns the job as created; resolution progress is visible through
    /// [`JobTracker::status`]. On a multi-threaded runtime the job may already
    /// be past `Created` by the time `status` reads it. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`Error::ShuttingDown`] once [`JobTracker::shutdown`] has begun.
    pub fn submit(&self, source_id: &str, format_id: &str) -> Result<Job> {
        if !self.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let job = self.store.create(source_id, format_id);
        tracing::info!(
            job_id = %job.id,
            source_id = %job.source_id,
            format_id = %job.format_id,
            "Download job created"
        );

        self.emit_event(Event::Created {
            id: job.id,
            source_id: job.source_id.clone(),
            format_id: job.format_id.clone(),
        });
        self.dispatcher.dispatch(&job);

        Ok(job)
    }

    /// Current snapshot of a job
    ///
    /// Ids that were never issued, were reaped, or are not even well-formed
    /// all yield [`Error::JobNotFound`].
    pub fn status(&self, id: &str) -> Result<Job> {
        id.parse::<JobId>()
            .ok()
            .and_then(|job_id| self.store.get(job_id))
            .ok_or_else(|| Error::JobNotFound(id.to_string()))
    }

    /// File location of a finished job
    ///
    /// # Errors
    ///
    /// [`Error::JobNotFound`] as for [`JobTracker::status`], and
    /// [`Error::NotReady`] while the job has not reached `Ready`.
    pub fn download_url(&self, id: &str) -> Result<String> {
        let job = self.status(id)?;
        match (job.state, job.download_url) {
            (JobState::Ready, Some(url)) => Ok(url),
            (state, _) => Err(Error::NotReady { id: job.id, state }),
        }
    }
}
