//! Periodic eviction of expired job records

use super::store::JobStore;
use crate::error::{Error, Result};
use crate::types::Event;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Removes records older than the TTL on a fixed period
///
/// Age is measured from `completed_at`, or from `created_at` for jobs that
/// never finished, so abandoned jobs are reclaimed too. Reaping a job whose
/// provider call is still running does not cancel the call; its late result
/// is dropped by the store.
pub struct Reaper {
    store: Arc<JobStore>,
    event_tx: broadcast::Sender<Event>,
    ttl: Duration,
    period: Duration,
    cancel: CancellationToken,
}

impl Reaper {
    /// Create a reaper sweeping every `period`, stopped by `cancel`
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `ttl` or `period` is zero.
    pub fn new(
        store: Arc<JobStore>,
        event_tx: broadcast::Sender<Event>,
        ttl: Duration,
        period: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        if ttl.is_zero() {
            return Err(zero_duration("jobs.ttl"));
        }
        if period.is_zero() {
            return Err(zero_duration("jobs.sweep_interval"));
        }

        Ok(Self {
            store,
            event_tx,
            ttl,
            period,
            cancel,
        })
    }

    /// Sweep until cancelled. The first sweep happens one period after start.
    pub async fn run(self) {
        tracing::info!(
            ttl_secs = self.ttl.as_secs(),
            period_secs = self.period.as_secs(),
            "Reaper started"
        );

        let mut interval =
            tokio::time::interval_at(tokio::time::Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    break;
                }
                _ = interval.tick() => {
                    self.sweep(Utc::now());
                }
            }
        }

        tracing::info!("Reaper stopped");
    }

    /// Evict every record expired at `now`, returning how many were removed
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut reaped = 0;

        for id in self.store.expired_ids(now, self.ttl) {
            // Re-checked under the record lock: a completion that landed after
            // the scan resets the age
            if self
                .store
                .remove_if(id, |job| job.is_expired(now, self.ttl))
                .is_some()
            {
                self.event_tx.send(Event::Reaped { id }).ok();
                reaped += 1;
            }
        }

        if reaped > 0 {
            tracing::info!(reaped, remaining = self.store.len(), "Reaped expired jobs");
        } else {
            tracing::debug!(remaining = self.store.len(), "Reaper sweep found nothing to evict");
        }

        reaped
    }
}

fn zero_duration(key: &str) -> Error {
    Error::Config {
        message: format!("{} must be greater than zero", key),
        key: Some(key.to_string()),
    }
}
