//! Reducer pipeline: maps every intent to exactly one state transition.

use std::fmt;
use std::sync::Arc;

use crate::intent::{Intent, IntentSender};
use crate::props::{Props, Snapshot};

/// A pure function from the snapshot at the history cursor to a patch.
///
/// Applying a transition yields `snapshot ⊕ patch`: only the fields listed in
/// the patch change.
#[derive(Clone)]
pub struct Transition {
    patch: Arc<dyn Fn(&Snapshot) -> Props + Send + Sync>,
}

impl Transition {
    pub fn new(patch: impl Fn(&Snapshot) -> Props + Send + Sync + 'static) -> Self {
        Self {
            patch: Arc::new(patch),
        }
    }

    /// The transition that leaves state unchanged.
    pub fn identity() -> Self {
        Self::new(|_| Props::new())
    }

    /// A transition that sets fixed field values regardless of prior state.
    pub fn set(fields: Props) -> Self {
        Self::new(move |_| fields.clone())
    }

    /// Compute the patch for `current`.
    pub fn patch(&self, current: &Snapshot) -> Props {
        (self.patch)(current)
    }

    /// Compute the next snapshot. `current` is never modified.
    pub fn apply(&self, current: &Snapshot) -> Snapshot {
        current.apply(&self.patch(current))
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transition(..)")
    }
}

/// The mapping stage supplied by the application.
///
/// Unrecognized intents should return [`Transition::identity`]. A reducer may
/// send follow-up intents through `intents`; they are processed after the
/// transition returned here has been applied.
pub trait IntentReducer: Send + Sync + 'static {
    fn reduce(&self, intent: &Intent, intents: &IntentSender) -> Transition;
}

impl<F> IntentReducer for F
where
    F: Fn(&Intent, &IntentSender) -> Transition + Send + Sync + 'static,
{
    fn reduce(&self, intent: &Intent, intents: &IntentSender) -> Transition {
        self(intent, intents)
    }
}

/// Shared, long-lived reducer stage of one connector.
#[derive(Clone)]
pub struct ReducerPipeline {
    reducer: Arc<dyn IntentReducer>,
}

impl ReducerPipeline {
    pub fn new(reducer: impl IntentReducer) -> Self {
        Self {
            reducer: Arc::new(reducer),
        }
    }

    /// Map one intent to its transition.
    pub fn transition_for(&self, intent: &Intent, intents: &IntentSender) -> Transition {
        self.reducer.reduce(intent, intents)
    }
}
