//! Job state transition table.
//!
//! ```text
//! Created          → Dispatched
//! Dispatched       → AwaitingProvider
//! AwaitingProvider → Ready | Failed
//! Ready, Failed    → (terminal)
//! ```
//!
//! A transition outside this table is not an error: the store reports it as
//! [`TransitionOutcome::Ignored`](crate::types::TransitionOutcome::Ignored)
//! and the caller drops it. Stale or duplicate completions end up there.

use crate::types::{Event, Job, JobId, JobState};
use chrono::{DateTime, Utc};

impl JobState {
    /// States reachable in one step from `self`
    pub fn allowed_next(&self) -> &'static [JobState] {
        match self {
            JobState::Created => &[JobState::Dispatched],
            JobState::Dispatched => &[JobState::AwaitingProvider],
            JobState::AwaitingProvider => &[JobState::Ready, JobState::Failed],
            JobState::Ready | JobState::Failed => &[],
        }
    }

    /// Whether `self → next` is in the transition table
    pub fn can_transition_to(&self, next: JobState) -> bool {
        self.allowed_next().contains(&next)
    }
}

/// A state change together with the fields it sets
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// `Created → Dispatched`
    Dispatch,
    /// `Dispatched → AwaitingProvider`
    AwaitProvider,
    /// `AwaitingProvider → Ready`
    Complete {
        /// Resolved file location
        download_url: String,
        /// Provider remark
        note: Option<String>,
    },
    /// `AwaitingProvider → Failed`
    Fail {
        /// Human-readable failure description
        error: String,
    },
}

impl Transition {
    /// State the job is in after the transition
    pub fn target(&self) -> JobState {
        match self {
            Transition::Dispatch => JobState::Dispatched,
            Transition::AwaitProvider => JobState::AwaitingProvider,
            Transition::Complete { .. } => JobState::Ready,
            Transition::Fail { .. } => JobState::Failed,
        }
    }

    /// States from which the transition is allowed
    pub fn sources(&self) -> &'static [JobState] {
        match self.target() {
            JobState::Dispatched => &[JobState::Created],
            JobState::AwaitingProvider => &[JobState::Dispatched],
            JobState::Ready | JobState::Failed => &[JobState::AwaitingProvider],
            JobState::Created => &[],
        }
    }

    /// Event announcing this transition for job `id`
    pub(crate) fn event(&self, id: JobId) -> Event {
        match self {
            Transition::Dispatch => Event::Dispatched { id },
            Transition::AwaitProvider => Event::AwaitingProvider { id },
            Transition::Complete { download_url, .. } => Event::Ready {
                id,
                download_url: download_url.clone(),
            },
            Transition::Fail { error } => Event::Failed {
                id,
                error: error.clone(),
            },
        }
    }

    /// Write the new state and its fields into `job`.
    ///
    /// `download_url` is set only on `Ready`, `error` only on `Failed`, and
    /// both terminal states stamp `completed_at`. The caller has already
    /// checked the transition table.
    pub(crate) fn apply(self, job: &mut Job, now: DateTime<Utc>) {
        job.state = self.target();
        match self {
            Transition::Dispatch | Transition::AwaitProvider => {}
            Transition::Complete { download_url, note } => {
                job.download_url = Some(download_url);
                job.note = note;
                job.error = None;
                job.completed_at = Some(now);
            }
            Transition::Fail { error } => {
                job.error = Some(error);
                job.download_url = None;
                job.note = None;
                job.completed_at = Some(now);
            }
        }
    }
}
