//! # vibe-dl
//!
//! Video download broker: accepts download requests, resolves them against an
//! upstream provider API in the background, and lets clients poll for the
//! resulting file location.
//!
//! ## Design
//!
//! - **Non-blocking submission** - `submit` registers a job and returns at once
//! - **Monotonic lifecycle** - `created → dispatched → awaiting_provider → ready | failed`
//! - **Bounded resolution** - at most `jobs.max_concurrent_resolutions` provider calls in flight
//! - **Bounded memory** - records are evicted once older than `jobs.ttl`
//! - **Event-driven** - consumers can subscribe to job events instead of polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vibe_dl::{Config, JobTracker, RapidApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let provider = Arc::new(RapidApiClient::new(&config.provider)?);
//!     let tracker = JobTracker::new(config, provider)?;
//!     tracker.start_reaper()?;
//!
//!     let job = tracker.submit("dQw4w9WgXcQ", "22")?;
//!     println!("job {} is {}", job.id, job.state);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Download job tracking (store, lifecycle, dispatcher, reaper)
pub mod jobs;
/// Upstream provider client
pub mod provider;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types and events
pub mod types;
/// Video URL parsing and metadata
pub mod video;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, ProviderError, Result, ToHttpStatus};
pub use jobs::JobTracker;
pub use provider::{DownloadLink, ProviderClient, RapidApiClient};
pub use types::{Event, Job, JobId, JobState, TransitionOutcome};
pub use video::VideoInfo;

/// Run the tracker until a termination signal arrives, then shut it down.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vibe_dl::{Config, JobTracker, RapidApiClient, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let provider = Arc::new(RapidApiClient::new(&config.provider)?);
///     let tracker = JobTracker::new(config, provider)?;
///
///     run_with_shutdown(tracker).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(tracker: JobTracker) -> Result<()> {
    wait_for_signal().await;
    tracker.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
