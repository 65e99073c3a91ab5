//! Connector: reducer + action creators, later bound to a view.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::binding::view::View;
use crate::intent::{Intent, IntentSender};
use crate::pipeline::{ReducerPipeline, Transition};

/// Turns call arguments into an intent.
pub type ActionCreator = Arc<dyn Fn(Value) -> Intent + Send + Sync>;

pub(crate) type ActionTable = Arc<BTreeMap<String, ActionCreator>>;

/// Start a connector from the intent reducer.
///
/// ```
/// use intentflow::{connect, Intent, IntentSender, Props, Transition};
///
/// let counter = connect(|intent: &Intent, _: &IntentSender| match intent.kind() {
///     "inc" => Transition::new(|s| {
///         Props::new().with("count", s.get_i64("count").unwrap_or(0) + 1)
///     }),
///     _ => Transition::identity(),
/// })
/// .action("inc", |_| Intent::new("inc"));
/// assert_eq!(counter.action_names().collect::<Vec<_>>(), vec!["inc"]);
/// ```
pub fn connect<F>(reducer: F) -> Connect
where
    F: Fn(&Intent, &IntentSender) -> Transition + Send + Sync + 'static,
{
    Connect {
        pipeline: ReducerPipeline::new(reducer),
        creators: BTreeMap::new(),
    }
}

pub struct Connect {
    pipeline: ReducerPipeline,
    creators: BTreeMap<String, ActionCreator>,
}

impl Connect {
    /// Register a named action creator. A later registration with the same
    /// name replaces the earlier one.
    pub fn action(
        mut self,
        name: impl Into<String>,
        creator: impl Fn(Value) -> Intent + Send + Sync + 'static,
    ) -> Self {
        self.creators.insert(name.into(), Arc::new(creator));
        self
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }

    /// Attach the view. The result can be mounted any number of times; each
    /// mount gets its own channel and history.
    pub fn bind<V: View>(self, view: V) -> Connected<V> {
        Connected {
            view: Arc::new(view),
            pipeline: self.pipeline,
            creators: Arc::new(self.creators),
        }
    }
}

/// A view bound to a reducer and action creators, ready to mount on a
/// [`Host`](crate::binding::Host).
pub struct Connected<V: View> {
    pub(crate) view: Arc<V>,
    pub(crate) pipeline: ReducerPipeline,
    pub(crate) creators: ActionTable,
}

impl<V: View> Clone for Connected<V> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            pipeline: self.pipeline.clone(),
            creators: Arc::clone(&self.creators),
        }
    }
}

impl<V: View> Connected<V> {
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }
}
