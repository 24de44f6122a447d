//! Shared test helpers: a scripted provider and tracker construction.

use crate::config::Config;
use crate::error::ProviderError;
use crate::jobs::JobTracker;
use crate::provider::{DownloadLink, ProviderClient, RawVideoInfo};
use crate::types::{Job, JobState};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

pub(crate) const FILE_URL: &str = "https://cdn.example/f.mp4";

/// What the scripted provider does on every `resolve_download` call
#[derive(Clone, Debug)]
pub(crate) enum Script {
    /// Answer with `FILE_URL` and the given note
    Succeed(Option<String>),
    /// Answer with this error
    Fail(ProviderError),
    /// Panic inside the provider future
    Panic,
    /// Answer with a whitespace-only file location
    EmptyUrl,
    /// Wait for a gate permit, then succeed
    Gated,
    /// Never answer
    Hang,
}

/// Provider double that follows a [`Script`] and counts calls
pub(crate) struct ScriptedProvider {
    script: Script,
    gate: Semaphore,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    video_info: Option<RawVideoInfo>,
}

impl ScriptedProvider {
    pub(crate) fn new(script: Script) -> Arc<Self> {
        Arc::new(Self::build(script, None))
    }

    pub(crate) fn with_video_info(script: Script, info: RawVideoInfo) -> Arc<Self> {
        Arc::new(Self::build(script, Some(info)))
    }

    fn build(script: Script, video_info: Option<RawVideoInfo>) -> Self {
        Self {
            script,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            video_info,
        }
    }

    /// Let `n` gated calls through
    pub(crate) fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn resolve_download(
        &self,
        _source_id: &str,
        _format_id: &str,
    ) -> Result<DownloadLink, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        match &self.script {
            Script::Succeed(note) => Ok(DownloadLink {
                file_url: FILE_URL.to_string(),
                note: note.clone(),
            }),
            Script::Fail(e) => Err(e.clone()),
            Script::Panic => panic!("provider exploded"),
            Script::EmptyUrl => Ok(DownloadLink {
                file_url: "   ".to_string(),
                note: None,
            }),
            Script::Gated => {
                self.gate.acquire().await.unwrap().forget();
                Ok(DownloadLink {
                    file_url: FILE_URL.to_string(),
                    note: None,
                })
            }
            Script::Hang => std::future::pending().await,
        }
    }

    async fn resolve_video_info(&self, _source_id: &str) -> Result<RawVideoInfo, ProviderError> {
        match (&self.video_info, &self.script) {
            (Some(info), _) => Ok(info.clone()),
            (None, Script::Fail(e)) => Err(e.clone()),
            (None, _) => Ok(RawVideoInfo::default()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Config tuned for tests: short timeouts, small pool
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.jobs.max_concurrent_resolutions = 4;
    config.jobs.shutdown_timeout = Duration::from_secs(2);
    config.provider.resolve_timeout = Duration::from_secs(5);
    config
}

/// Tracker backed by `provider` with [`test_config`]
pub(crate) fn create_test_tracker(provider: Arc<ScriptedProvider>) -> JobTracker {
    create_test_tracker_with(provider, test_config())
}

pub(crate) fn create_test_tracker_with(
    provider: Arc<ScriptedProvider>,
    config: Config,
) -> JobTracker {
    JobTracker::new(config, provider).unwrap()
}

/// Poll until the job is terminal (panics after 5 seconds)
pub(crate) async fn wait_for_terminal(tracker: &JobTracker, id: &str) -> Job {
    wait_for(tracker, id, |job| job.state.is_terminal()).await
}

/// Poll until the job reaches `state` (panics after 5 seconds)
pub(crate) async fn wait_for_state(tracker: &JobTracker, id: &str, state: JobState) -> Job {
    wait_for(tracker, id, |job| job.state == state).await
}

async fn wait_for(tracker: &JobTracker, id: &str, done: impl Fn(&Job) -> bool) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = tracker.status(id).unwrap();
        if done(&job) {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} stuck in {}",
            job.state
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
