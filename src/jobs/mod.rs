//! Asynchronous download job tracking.
//!
//! The [`JobTracker`] facade and its collaborators:
//! - [`store`] - Concurrency-safe job records with conditional transitions
//! - [`lifecycle`] - The state transition table
//! - [`dispatcher`] - Bounded background resolution of submitted jobs
//! - [`reaper`] - Periodic eviction of expired records
//! - `control` - Submission, status and file reclaim
//! - `resolve` - Synchronous provider lookups (video info, direct download)
//! - `services` - Background service starters
//! - `shutdown` - Graceful shutdown

mod control;
pub mod dispatcher;
pub mod lifecycle;
pub mod reaper;
mod resolve;
mod services;
mod shutdown;
pub mod store;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use dispatcher::Dispatcher;
pub use lifecycle::Transition;
pub use reaper::Reaper;
pub use store::JobStore;

use crate::config::Config;
use crate::error::Result;
use crate::provider::ProviderClient;
use crate::types::Event;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Job tracker instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct JobTracker {
    /// Job records
    pub(crate) store: Arc<JobStore>,
    /// Background resolution pool
    pub(crate) dispatcher: Dispatcher,
    /// Upstream provider, shared with the dispatcher
    pub(crate) provider: Arc<dyn ProviderClient>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Configuration
    pub(crate) config: Arc<Config>,
    /// Cancelled on shutdown; stops the reaper
    pub(crate) shutdown_token: CancellationToken,
    /// Cleared on shutdown; new submissions are rejected afterwards
    pub(crate) accepting_new: Arc<AtomicBool>,
}

impl JobTracker {
    /// Create a job tracker backed by `provider`
    ///
    /// Validates `config`. No background work starts until the first
    /// submission (or [`JobTracker::start_reaper`]).
    pub fn new(config: Config, provider: Arc<dyn ProviderClient>) -> Result<Self> {
        config.validate()?;

        if !provider.is_configured() {
            tracing::warn!(
                provider = provider.name(),
                "Provider API key not configured, downloads will fail until one is set"
            );
        }

        let (event_tx, _rx) = broadcast::channel(config.jobs.event_buffer);
        let store = Arc::new(JobStore::new());
        let dispatcher = Dispatcher::new(
            Arc::clone(&store),
            Arc::clone(&provider),
            event_tx.clone(),
            config.jobs.max_concurrent_resolutions,
            config.provider.resolve_timeout,
        );

        tracing::info!(
            provider = provider.name(),
            max_concurrent_resolutions = config.jobs.max_concurrent_resolutions,
            ttl_secs = config.jobs.ttl.as_secs(),
            "Job tracker initialized"
        );

        Ok(Self {
            store,
            dispatcher,
            provider,
            event_tx,
            config: Arc::new(config),
            shutdown_token: CancellationToken::new(),
            accepting_new: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Subscribe to job events
    ///
    /// Each subscriber receives every event independently. Subscribers that
    /// fall more than `jobs.event_buffer` events behind get
    /// `RecvError::Lagged` and lose the overflow.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use vibe_dl::{Config, JobTracker, RapidApiClient};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = Config::default();
    ///     let provider = Arc::new(RapidApiClient::new(&config.provider)?);
    ///     let tracker = JobTracker::new(config, provider)?;
    ///
    ///     let mut events = tracker.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             tracing::info!(?event, "job event");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Provider name and whether it has credentials
    pub fn provider_status(&self) -> (&str, bool) {
        (self.provider.name(), self.provider.is_configured())
    }

    /// Number of live job records
    pub fn job_count(&self) -> usize {
        self.store.len()
    }

    /// Emit an event to all subscribers
    ///
    /// With no subscribers the event is dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let tracker = Arc::clone(self);
        let config = Arc::clone(&self.config);

        tokio::spawn(async move { crate::api::start_api_server(tracker, config).await })
    }
}
