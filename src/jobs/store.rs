//! In-memory job records.
//!
//! The map lock only guards membership. Each record sits behind its own
//! mutex, so reads and transitions on one id never wait for work on another
//! id. Membership changes (create, delete) take the map write lock briefly
//! and never while a record lock is held elsewhere.
//!
//! All operations are synchronous: nothing here awaits, so a snapshot taken
//! right after [`JobStore::create`] always sees the record as created.

use super::lifecycle::Transition;
use crate::types::{Job, JobId, JobState, TransitionOutcome};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Concurrency-safe keyed container owning every job record
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Mutex<Job>>>,
}

impl JobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job in state `Created` and return its snapshot
    ///
    /// The id is a fresh random UUID; on the (astronomically unlikely)
    /// collision with a live id a new one is drawn, so an existing record is
    /// never overwritten.
    pub fn create(&self, source_id: impl Into<String>, format_id: impl Into<String>) -> Job {
        let source_id = source_id.into();
        let format_id = format_id.into();
        let mut jobs = self.write();

        loop {
            let id = JobId::new();
            if let Entry::Vacant(slot) = jobs.entry(id) {
                let job = Job::created(id, source_id, format_id);
                slot.insert(Mutex::new(job.clone()));
                return job;
            }
        }
    }

    /// Snapshot of the record, or `None` if the id is unknown or reaped
    pub fn get(&self, id: JobId) -> Option<Job> {
        let jobs = self.read();
        jobs.get(&id).map(|record| lock(record).clone())
    }

    /// Conditionally apply `transition` to one record.
    ///
    /// The record is updated only if its current state is in `expected` and
    /// the transition table allows the move. The check and the update happen
    /// under the record's lock, so no reader ever sees a half-applied change.
    pub fn transition(
        &self,
        id: JobId,
        expected: &[JobState],
        transition: Transition,
    ) -> TransitionOutcome {
        let jobs = self.read();
        let Some(record) = jobs.get(&id) else {
            return TransitionOutcome::NotFound;
        };

        let mut job = lock(record);
        if !expected.contains(&job.state) || !job.state.can_transition_to(transition.target()) {
            return TransitionOutcome::Ignored;
        }

        transition.apply(&mut job, Utc::now());
        TransitionOutcome::Applied
    }

    /// Remove a record, returning whether it existed
    pub fn delete(&self, id: JobId) -> bool {
        self.write().remove(&id).is_some()
    }

    /// Remove a record if `predicate` holds for its current contents
    ///
    /// The predicate runs with the record locked, so a transition racing the
    /// removal is either fully visible to it or not started.
    pub fn remove_if(&self, id: JobId, predicate: impl FnOnce(&Job) -> bool) -> Option<Job> {
        let mut jobs = self.write();
        let matches = jobs.get(&id).is_some_and(|record| predicate(&lock(record)));
        if !matches {
            return None;
        }
        jobs.remove(&id)
            .map(|record| record.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    /// Ids of every record whose age exceeds `ttl` at `now`
    pub fn expired_ids(&self, now: DateTime<Utc>, ttl: std::time::Duration) -> Vec<JobId> {
        let jobs = self.read();
        jobs.iter()
            .filter(|(_, record)| lock(record).is_expired(now, ttl))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Snapshots of every record (no particular order)
    pub fn snapshot(&self) -> Vec<Job> {
        let jobs = self.read();
        jobs.values().map(|record| lock(record).clone()).collect()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<JobId, Mutex<Job>>> {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<JobId, Mutex<Job>>> {
        self.jobs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Records are only mutated through `Transition::apply`, which cannot leave a
// half-written record, so a poisoned lock still holds a consistent job.
fn lock(record: &Mutex<Job>) -> MutexGuard<'_, Job> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}
