use super::test_helpers::*;
use super::*;
use crate::error::{Error, ProviderError};
use crate::types::{Event, JobState};
use std::time::Duration;


/// Collect events for one job until it reaches a terminal state
async fn collect_until_terminal(
    events: &mut broadcast::Receiver<Event>,
    id: crate::types::JobId,
) -> Vec<Event> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for job events")
            .unwrap();

        let (matches, terminal) = match &event {
            Event::Created { id: e, .. }
            | Event::Dispatched { id: e }
            | Event::AwaitingProvider { id: e } => (*e == id, false),
            Event::Ready { id: e, .. } | Event::Failed { id: e, .. } => (*e == id, true),
            Event::Reaped { .. } | Event::Shutdown => (false, false),
        };

        if matches {
            seen.push(event);
            if terminal {
                return seen;
            }
        }
    }
}
