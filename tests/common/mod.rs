//! Common test utilities for vibe-dl integration tests

use std::sync::Arc;
use std::time::Duration;
use vibe_dl::{Config, Job, JobTracker, RapidApiClient};

/// Config pointing the RapidAPI client at `base_url` with fast retries
pub fn mock_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.provider.api_key = Some("test-key".to_string());
    config.provider.base_url = Some(base_url.to_string());
    config.provider.request_timeout = Duration::from_secs(2);
    config.provider.resolve_timeout = Duration::from_secs(5);
    config.provider.retry.initial_delay = Duration::from_millis(10);
    config.provider.retry.max_delay = Duration::from_millis(20);
    config.provider.retry.jitter = false;
    config.jobs.shutdown_timeout = Duration::from_secs(2);
    config
}

/// Tracker backed by a real [`RapidApiClient`]
pub fn create_tracker(config: Config) -> JobTracker {
    let provider = Arc::new(RapidApiClient::new(&config.provider).expect("client should build"));
    JobTracker::new(config, provider).expect("tracker should build")
}

/// Poll until the job is ready or failed (panics after 10 seconds)
pub async fn wait_for_terminal(tracker: &JobTracker, id: &str) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let job = tracker.status(id).expect("job should exist");
        if job.state.is_terminal() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} stuck in {}",
            job.state
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
