//! Background resolution of submitted jobs.
//!
//! Every job gets one task, tracked by a [`TaskTracker`] so shutdown can wait
//! for stragglers. A semaphore bounds how many provider calls run at once;
//! jobs beyond the limit wait in `Dispatched`.

use super::lifecycle::Transition;
use super::store::JobStore;
use crate::error::ProviderError;
use crate::provider::{DownloadLink, ProviderClient};
use crate::types::{Event, Job, JobId, TransitionOutcome};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, broadcast};
use tokio_util::task::TaskTracker;

/// Drives jobs from `Created` to `Ready` or `Failed`
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<JobStore>,
    provider: Arc<dyn ProviderClient>,
    event_tx: broadcast::Sender<Event>,
    permits: Arc<Semaphore>,
    tasks: TaskTracker,
    resolve_timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher allowing `max_concurrent` provider calls at once
    pub fn new(
        store: Arc<JobStore>,
        provider: Arc<dyn ProviderClient>,
        event_tx: broadcast::Sender<Event>,
        max_concurrent: usize,
        resolve_timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            event_tx,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            tasks: TaskTracker::new(),
            resolve_timeout,
        }
    }

    /// Start resolving `job` in the background. Returns immediately.
    pub fn dispatch(&self, job: &Job) {
        let dispatcher = self.clone();
        let id = job.id;
        let source_id = job.source_id.clone();
        let format_id = job.format_id.clone();

        self.tasks
            .spawn(async move { dispatcher.run(id, source_id, format_id).await });
    }

    /// Number of resolution tasks still running
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Stop tracking new tasks and wait for running ones
    ///
    /// Returns `false` if `timeout` elapsed first. Provider calls still in
    /// flight at that point keep running detached.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tasks.close();
        tokio::time::timeout(timeout, self.tasks.wait()).await.is_ok()
    }

    async fn run(self, id: JobId, source_id: String, format_id: String) {
        if !self.advance(id, Transition::Dispatch) {
            return;
        }

        let permit = self.permits.acquire().await;

        if !self.advance(id, Transition::AwaitProvider) {
            return;
        }

        let result = match permit {
            Ok(_permit) => self.resolve(&source_id, &format_id).await,
            Err(_) => Err(ProviderError::InternalFault(
                "resolution pool closed".to_string(),
            )),
        };

        let transition = match result {
            Ok(link) => {
                tracing::info!(job_id = %id, source_id = %source_id, "Download link resolved");
                Transition::Complete {
                    download_url: link.file_url,
                    note: link.note,
                }
            }
            Err(e) => {
                if matches!(e, ProviderError::InternalFault(_)) {
                    tracing::error!(job_id = %id, error = %e, "Resolution task faulted");
                } else {
                    tracing::warn!(job_id = %id, source_id = %source_id, error = %e, "Download resolution failed");
                }
                Transition::Fail {
                    error: e.to_string(),
                }
            }
        };

        self.advance(id, transition);
    }

    /// Call the provider with a deadline, turning panics and empty answers
    /// into provider errors
    pub(crate) async fn resolve(
        &self,
        source_id: &str,
        format_id: &str,
    ) -> Result<DownloadLink, ProviderError> {
        let call = AssertUnwindSafe(self.provider.resolve_download(source_id, format_id))
            .catch_unwind();

        match tokio::time::timeout(self.resolve_timeout, call).await {
            Err(_) => Err(ProviderError::Timeout(self.resolve_timeout)),
            Ok(Err(panic)) => Err(ProviderError::InternalFault(panic_message(panic.as_ref()))),
            Ok(Ok(Ok(link))) if link.file_url.trim().is_empty() => Err(ProviderError::Malformed(
                "provider returned an empty file location".to_string(),
            )),
            Ok(Ok(result)) => result,
        }
    }

    /// Apply a transition and publish it; `false` means the job should be abandoned
    fn advance(&self, id: JobId, transition: Transition) -> bool {
        let event = transition.event(id);
        let target = transition.target();

        match self.store.transition(id, transition.sources(), transition) {
            TransitionOutcome::Applied => {
                // No subscribers is fine
                self.event_tx.send(event).ok();
                true
            }
            TransitionOutcome::Ignored => {
                tracing::debug!(job_id = %id, to = %target, "Transition ignored");
                false
            }
            TransitionOutcome::NotFound => {
                tracing::debug!(job_id = %id, to = %target, "Job no longer tracked, abandoning");
                false
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("provider call panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("provider call panicked: {}", s)
    } else {
        "provider call panicked".to_string()
    }
}
