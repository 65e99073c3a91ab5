//! Helpers for exercising mounted instances from tests.
//!
//! - [`run_sequence`]: perform actions one by one, yielding to the runtime
//!   between steps so future-sourced actions get a chance to resolve;
//! - [`history_stream_of`]: a live feed of snapshots appended from now on;
//! - [`intent_stream_of`]: a live feed of intents sent from now on.

use std::future::Future;
use std::time::Duration;

use crate::binding::{Mounted, View};
use crate::history::HistoryStream;
use crate::intent::IntentStream;
use crate::props::Snapshot;

/// How long [`settle`] waits before giving up.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// One deferred step of a [`run_sequence`].
pub type Step<'a> = Box<dyn FnOnce() + Send + 'a>;

pub fn step<'a>(f: impl FnOnce() + Send + 'a) -> Step<'a> {
    Box::new(f)
}

/// Run `steps` in order with a scheduler yield after each.
pub async fn run_sequence<'a>(steps: impl IntoIterator<Item = Step<'a>>) {
    for step in steps {
        step();
        tokio::task::yield_now().await;
    }
}

/// Await `future` for at most [`SETTLE_TIMEOUT`].
pub async fn settle<F: Future>(future: F) -> Option<F::Output> {
    tokio::time::timeout(SETTLE_TIMEOUT, future).await.ok()
}

/// Snapshots appended to an instance's history, ignoring navigation.
pub struct SnapshotFeed {
    events: HistoryStream,
}

impl SnapshotFeed {
    pub async fn next(&mut self) -> Option<Snapshot> {
        loop {
            let event = self.events.next().await?;
            if event.is_append() {
                return Some(event.snapshot().clone());
            }
        }
    }

    /// Wait for `n` appended snapshots and return the last one.
    pub async fn take_last(&mut self, n: usize) -> Option<Snapshot> {
        let mut last = None;
        for _ in 0..n {
            last = Some(self.next().await?);
        }
        last
    }
}

pub fn history_stream_of<V: View>(instance: &Mounted<V>) -> SnapshotFeed {
    SnapshotFeed {
        events: instance.history_stream(),
    }
}

pub fn intent_stream_of<V: View>(instance: &Mounted<V>) -> IntentStream {
    instance.intent_stream()
}
