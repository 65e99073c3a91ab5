//! Intent-driven component state with time-travel history.
//!
//! Actions become [`Intent`]s on a per-instance [`IntentChannel`]; a reducer
//! maps each intent to a [`Transition`]; every resulting [`Snapshot`] is
//! recorded in a [`HistoryStore`] that can step backward and forward; the
//! bound [`View`] re-renders whenever the snapshot at the cursor changes.

pub mod binding;
pub mod config;
pub mod error;
pub mod history;
pub mod intent;
pub mod logging;
pub mod mvi;
pub mod pipeline;
pub mod props;
pub mod subscription;
pub mod testing;

pub use binding::{
    connect, ActionOutcome, Actions, Connect, Connected, HistoryControls, Host, InstanceId,
    Mounted, PendingAction, View,
};
pub use error::EngineError;
pub use history::{HistoryEvent, HistoryStore};
pub use intent::{Intent, IntentChannel, IntentSender, IntentStream};
pub use pipeline::{IntentReducer, ReducerPipeline, Transition};
pub use props::{Props, Snapshot};
pub use subscription::{EventStream, Subscription};
