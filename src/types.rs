//! Core types for vibe-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a download job
///
/// Backed by a random (v4) UUID, so ids carry 122 bits of randomness and are
/// never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random JobId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Job state
///
/// States advance monotonically:
/// `Created → Dispatched → AwaitingProvider → Ready | Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Registered, not yet picked up by the dispatcher
    Created,
    /// Handed to the dispatcher pool, waiting for a free slot
    Dispatched,
    /// Provider call in flight
    AwaitingProvider,
    /// Provider returned a file location
    Ready,
    /// Resolution failed
    Failed,
}

impl JobState {
    /// Wire name of the state (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::Dispatched => "dispatched",
            JobState::AwaitingProvider => "awaiting_provider",
            JobState::Ready => "ready",
            JobState::Failed => "failed",
        }
    }

    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Ready | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a download job record
///
/// Values of this type are copies: holding one never blocks the store, and it
/// never changes after it was taken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Job {
    /// Job ID
    pub id: JobId,
    /// Video identifier the job resolves
    pub source_id: String,
    /// Requested format token (provider quality id)
    pub format_id: String,
    /// Current state
    pub state: JobState,
    /// File location, present iff `state == Ready`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Free-form provider remark accompanying the file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Failure description, present iff `state == Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job reached `Ready` or `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Build a freshly created job record
    pub(crate) fn created(id: JobId, source_id: String, format_id: String) -> Self {
        Self {
            id,
            source_id,
            format_id,
            state: JobState::Created,
            download_url: None,
            note: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Age of the record at `now`, measured from completion if the job
    /// completed, otherwise from creation. Clock skew yields zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        let reference = self.completed_at.unwrap_or(self.created_at);
        (now - reference).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the record outlived `ttl` at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age_at(now) > ttl
    }
}

/// Result of a conditional state transition
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The record was updated
    Applied,
    /// The record exists but its state did not permit the transition
    Ignored,
    /// No record with that id (never existed or already reaped)
    NotFound,
}

/// Event emitted during the job lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Job registered
    Created {
        /// Job ID
        id: JobId,
        /// Video identifier
        source_id: String,
        /// Requested format
        format_id: String,
    },

    /// Job handed to the dispatcher pool
    Dispatched {
        /// Job ID
        id: JobId,
    },

    /// Provider call started
    AwaitingProvider {
        /// Job ID
        id: JobId,
    },

    /// File location resolved
    Ready {
        /// Job ID
        id: JobId,
        /// Resolved file location
        download_url: String,
    },

    /// Resolution failed
    Failed {
        /// Job ID
        id: JobId,
        /// Error message
        error: String,
    },

    /// Job record evicted after its TTL
    Reaped {
        /// Job ID
        id: JobId,
    },

    /// Tracker shutting down
    Shutdown,
}

impl Event {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Created { .. } => "created",
            Event::Dispatched { .. } => "dispatched",
            Event::AwaitingProvider { .. } => "awaiting_provider",
            Event::Ready { .. } => "ready",
            Event::Failed { .. } => "failed",
            Event::Reaped { .. } => "reaped",
            Event::Shutdown => "shutdown",
        }
    }
}
