//! Thread-safe history store driving the [`HistoryReducer`].
//!
//! All mutations go through the reducer; the store only adds locking and
//! change notification. Clamped navigation leaves the state equal to what it
//! was, in which case no event is emitted.

use parking_lot::Mutex;

use crate::history::message::HistoryMessage;
use crate::history::reducer::HistoryReducer;
use crate::history::state::HistoryState;
use crate::mvi::Reducer;
use crate::pipeline::Transition;
use crate::props::Snapshot;
use crate::subscription::{EventStream, ObserverSet, Subscription};

/// Change notification emitted by a [`HistoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    /// A snapshot was recorded and the cursor moved onto it.
    Appended {
        snapshot: Snapshot,
        cursor: usize,
        len: usize,
    },
    /// The cursor moved to an existing snapshot.
    Moved {
        snapshot: Snapshot,
        cursor: usize,
        len: usize,
    },
}

impl HistoryEvent {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            HistoryEvent::Appended { snapshot, .. } | HistoryEvent::Moved { snapshot, .. } => {
                snapshot
            }
        }
    }

    pub fn is_append(&self) -> bool {
        matches!(self, HistoryEvent::Appended { .. })
    }
}

pub type HistoryStream = EventStream<HistoryEvent>;

pub struct HistoryStore {
    label: String,
    state: Mutex<HistoryState>,
    events: ObserverSet<HistoryEvent>,
}

impl HistoryStore {
    /// Create a store seeded with `baseline`. `max_entries == 0` is unbounded.
    pub fn new(label: impl Into<String>, baseline: Snapshot, max_entries: usize) -> Self {
        Self {
            label: label.into(),
            state: Mutex::new(HistoryState::new(baseline, max_entries)),
            events: ObserverSet::new(),
        }
    }

    /// Apply `transition` to the current snapshot and record the result.
    ///
    /// The transition runs under the store lock and must not call back into
    /// this store.
    pub fn append(&self, transition: &Transition) -> Snapshot {
        let (snapshot, cursor, len) = {
            let mut state = self.state.lock();
            let next = transition.apply(state.current());
            let taken = std::mem::take(&mut *state);
            *state = HistoryReducer::reduce(taken, HistoryMessage::Append(next));
            (state.current().clone(), state.cursor(), state.len())
        };

        tracing::debug!(history = %self.label, cursor, len, "Snapshot appended");
        self.events.notify(&HistoryEvent::Appended {
            snapshot: snapshot.clone(),
            cursor,
            len,
        });
        snapshot
    }

    /// Step back one entry; returns the snapshot now at the cursor.
    pub fn backward(&self) -> Snapshot {
        self.navigate(HistoryMessage::Backward)
    }

    /// Step forward one entry; returns the snapshot now at the cursor.
    pub fn forward(&self) -> Snapshot {
        self.navigate(HistoryMessage::Forward)
    }

    fn navigate(&self, message: HistoryMessage) -> Snapshot {
        let (snapshot, event) = {
            let mut state = self.state.lock();
            let before = state.cursor();
            let taken = std::mem::take(&mut *state);
            *state = HistoryReducer::reduce(taken, message);
            let snapshot = state.current().clone();
            let event = (state.cursor() != before).then(|| HistoryEvent::Moved {
                snapshot: snapshot.clone(),
                cursor: state.cursor(),
                len: state.len(),
            });
            (snapshot, event)
        };

        match event {
            Some(event) => {
                if let HistoryEvent::Moved { cursor, len, .. } = &event {
                    tracing::debug!(history = %self.label, cursor, len, "History cursor moved");
                }
                self.events.notify(&event);
            }
            None => {
                tracing::trace!(history = %self.label, "History navigation clamped");
            }
        }
        snapshot
    }

    pub fn current(&self) -> Snapshot {
        self.state.lock().current().clone()
    }

    pub fn cursor(&self) -> usize {
        self.state.lock().cursor()
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    pub fn can_backward(&self) -> bool {
        self.state.lock().can_backward()
    }

    pub fn can_forward(&self) -> bool {
        self.state.lock().can_forward()
    }

    /// Copy of every recorded snapshot, oldest first.
    pub fn entries(&self) -> Vec<Snapshot> {
        self.state.lock().entries().to_vec()
    }

    /// Copy of the full state, for inspection.
    pub fn state(&self) -> HistoryState {
        self.state.lock().clone()
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&HistoryEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.events.subscribe(observer)
    }

    pub fn stream(&self) -> HistoryStream {
        self.events.stream()
    }

    /// Release all observers. Used on teardown.
    pub fn release_observers(&self) {
        self.events.clear();
    }
}
