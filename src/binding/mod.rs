//! Binding adapter: connects a reducer and action creators to a view.
//!
//! ```text
//! connect(reducer).action(..).bind(view)  ──→  Connected<V>
//! Host::mount(&connected, props)          ──→  Mounted<V>
//!
//! Actions ──→ IntentChannel ──→ ReducerPipeline ──→ HistoryStore ──→ View::render
//!                  ↑                  │
//!                  └── follow-ups ────┘
//! ```

mod actions;
mod connect;
mod host;
mod instance;
mod lifecycle;
pub mod merge;
mod view;

pub use actions::{ActionOutcome, Actions, PendingAction};
pub use connect::{connect, ActionCreator, Connect, Connected};
pub use host::Host;
pub use instance::{InstanceId, Mounted};
pub use lifecycle::{Lifecycle, LifecycleHandle};
pub use view::{HistoryControls, View};
