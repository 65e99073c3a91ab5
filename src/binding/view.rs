//! The view side of a binding: what a component declares and how it renders.

use std::fmt;
use std::sync::Arc;

use crate::props::Props;

/// A renderable component driven by merged props.
///
/// `default_props` declares both the default values and the set of keys that
/// history-driven state is allowed to own. It is read once per mount.
pub trait View: Send + Sync + 'static {
    type Output: Clone + Send + 'static;

    fn default_props(&self) -> Props;

    /// Produce output for `props`. `history` is present when the instance was
    /// mounted with the `history` flag. Must not drive navigation itself.
    fn render(&self, props: &Props, history: Option<&HistoryControls>) -> Self::Output;
}

/// Backward/forward triggers handed to a view rendered with history enabled.
///
/// Clicking either one moves the instance's history cursor and re-renders.
/// Triggers outliving their instance do nothing.
#[derive(Clone)]
pub struct HistoryControls {
    backward: Arc<dyn Fn() + Send + Sync>,
    forward: Arc<dyn Fn() + Send + Sync>,
}

impl HistoryControls {
    pub(crate) fn new(
        backward: impl Fn() + Send + Sync + 'static,
        forward: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            backward: Arc::new(backward),
            forward: Arc::new(forward),
        }
    }

    pub fn backward(&self) {
        (self.backward)()
    }

    pub fn forward(&self) {
        (self.forward)()
    }
}

impl fmt::Debug for HistoryControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HistoryControls")
    }
}

impl PartialEq for HistoryControls {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.backward, &other.backward) && Arc::ptr_eq(&self.forward, &other.forward)
    }
}
