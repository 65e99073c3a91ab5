//! A mounted, history-tracked view instance.
//!
//! Each instance owns one intent channel and one history store, created at
//! mount and released at unmount. The reducer pipeline is subscribed to the
//! channel; every intent becomes one appended snapshot, after which the
//! merged props are recomputed and the view re-rendered if they changed.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::binding::actions::Actions;
use crate::binding::connect::{ActionTable, Connected};
use crate::binding::lifecycle::Lifecycle;
use crate::binding::merge;
use crate::binding::view::{HistoryControls, View};
use crate::config::EngineConfig;
use crate::history::{HistoryEvent, HistoryState, HistoryStore, HistoryStream};
use crate::intent::{Intent, IntentChannel, IntentSender, IntentStream};
use crate::pipeline::{ReducerPipeline, Transition};
use crate::props::{Props, Snapshot};
use crate::subscription::Subscription;

/// Unique id of a mounted instance, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Teardown entry point the host can hold without knowing the view type.
pub(crate) trait Teardown: Send + Sync {
    fn teardown(&self);
    fn is_torn_down(&self) -> bool;
}

struct RenderState<O> {
    props: Props,
    output: Option<O>,
    count: u64,
}

struct Inner<V: View> {
    id: InstanceId,
    view: Arc<V>,
    defaults: Props,
    overridable: BTreeSet<String>,
    external: RwLock<Props>,
    channel: IntentChannel,
    history: HistoryStore,
    pipeline: ReducerPipeline,
    creators: ActionTable,
    controls: Option<HistoryControls>,
    render: Mutex<RenderState<V::Output>>,
    lifecycle: Lifecycle,
    pipeline_subscription: Mutex<Option<Subscription>>,
}

#[derive(Clone, Copy)]
enum Step {
    Backward,
    Forward,
}

impl<V: View> Inner<V> {
    fn on_intent(&self, intent: &Intent) {
        let transition = self
            .pipeline
            .transition_for(intent, &self.channel.sender());
        self.history.append(&transition);
        self.rerender();
    }

    fn step(&self, step: Step) {
        if self.lifecycle.is_unmounted() {
            return;
        }
        match step {
            Step::Backward => self.history.backward(),
            Step::Forward => self.history.forward(),
        };
        self.rerender();
    }

    /// Render when the merged props differ from the last rendered ones.
    fn rerender(&self) {
        let mut render = self.render.lock();
        let merged = {
            let external = self.external.read();
            merge::render_props(&self.defaults, &external, &self.history.current())
        };
        if render.output.is_some() && render.props == merged {
            return;
        }

        let output = self.view.render(&merged, self.controls.as_ref());
        render.props = merged;
        render.output = Some(output);
        render.count += 1;
        tracing::trace!(instance = %self.id, renders = render.count, "Rendered");
    }

    fn set_props(&self, props: Props) {
        if self.lifecycle.is_unmounted() {
            return;
        }
        let (next, _) = merge::split_capabilities(props);
        let patch = merge::reassertion_patch(&self.overridable, &self.history.current(), &next);
        *self.external.write() = next;

        if !patch.is_empty() {
            tracing::debug!(
                instance = %self.id,
                fields = patch.len(),
                "External props re-asserted into state"
            );
            self.history.append(&Transition::set(patch));
        }
        self.rerender();
    }
}

impl<V: View> Teardown for Inner<V> {
    fn teardown(&self) {
        if !self.lifecycle.signal_unmount() {
            return;
        }
        self.pipeline_subscription.lock().take();
        self.channel.close();
        self.history.release_observers();
        tracing::info!(instance = %self.id, "Unmounted");
    }

    fn is_torn_down(&self) -> bool {
        self.lifecycle.is_unmounted()
    }
}

impl<V: View> Drop for Inner<V> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Handle to a mounted instance. Clones share the instance.
pub struct Mounted<V: View> {
    inner: Arc<Inner<V>>,
}

impl<V: View> Clone for Mounted<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: View> Mounted<V> {
    pub(crate) fn mount(connected: &Connected<V>, props: Props, config: &EngineConfig) -> Self {
        let id = InstanceId::new();
        let label = id.to_string();
        let defaults = connected.view.default_props();
        let overridable = defaults.key_set();
        let (external, history_enabled) = merge::split_capabilities(props);
        let baseline = Snapshot::new(merge::seed_state(&defaults, &overridable, &external));

        let inner = Arc::new_cyclic(|weak: &Weak<Inner<V>>| {
            let controls = history_enabled.then(|| {
                let back = weak.clone();
                let fwd = weak.clone();
                HistoryControls::new(
                    move || {
                        if let Some(inner) = back.upgrade() {
                            inner.step(Step::Backward);
                        }
                    },
                    move || {
                        if let Some(inner) = fwd.upgrade() {
                            inner.step(Step::Forward);
                        }
                    },
                )
            });

            Inner {
                id,
                view: Arc::clone(&connected.view),
                defaults,
                overridable,
                external: RwLock::new(external),
                channel: IntentChannel::new(label.clone()),
                history: HistoryStore::new(label.clone(), baseline, config.history.max_entries),
                pipeline: connected.pipeline.clone(),
                creators: Arc::clone(&connected.creators),
                controls,
                render: Mutex::new(RenderState {
                    props: Props::new(),
                    output: None,
                    count: 0,
                }),
                lifecycle: Lifecycle::new(),
                pipeline_subscription: Mutex::new(None),
            }
        });

        let weak = Arc::downgrade(&inner);
        let subscription = inner.channel.subscribe(move |intent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_intent(intent);
            }
        });
        *inner.pipeline_subscription.lock() = Some(subscription);

        inner.rerender();
        tracing::info!(
            instance = %inner.id,
            history = history_enabled,
            max_entries = config.history.max_entries,
            "Mounted"
        );

        Self { inner }
    }

    pub(crate) fn teardown_handle(&self) -> Weak<dyn Teardown> {
        let strong: Arc<dyn Teardown> = self.inner.clone();
        Arc::downgrade(&strong)
    }

    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    /// The instance's action surface.
    pub fn actions(&self) -> Actions {
        Actions::new(
            self.inner.id.to_string(),
            Arc::clone(&self.inner.creators),
            self.inner.channel.sender(),
            self.inner.lifecycle.handle(),
        )
    }

    /// Externally supplied props exactly as given (minus capability flags).
    /// History never changes these.
    pub fn props(&self) -> Props {
        self.inner.external.read().clone()
    }

    /// Props the view received on its last render.
    pub fn rendered_props(&self) -> Props {
        self.inner.render.lock().props.clone()
    }

    /// Output of the last render.
    pub fn rendered(&self) -> Option<V::Output> {
        self.inner.render.lock().output.clone()
    }

    pub fn render_count(&self) -> u64 {
        self.inner.render.lock().count
    }

    /// Replace the external props, as a parent re-render would.
    ///
    /// Declared keys whose value differs from the snapshot at the cursor are
    /// written into state as a new history entry. When the cursor is behind
    /// the tail this discards the redo branch, like any other append.
    pub fn set_props(&self, props: Props) {
        self.inner.set_props(props);
    }

    pub fn history_enabled(&self) -> bool {
        self.inner.controls.is_some()
    }

    /// The backward/forward triggers, when mounted with `history`.
    pub fn history_controls(&self) -> Option<HistoryControls> {
        self.inner.controls.clone()
    }

    pub fn backward(&self) {
        self.inner.step(Step::Backward);
    }

    pub fn forward(&self) {
        self.inner.step(Step::Forward);
    }

    /// Snapshot at the history cursor.
    pub fn current(&self) -> Snapshot {
        self.inner.history.current()
    }

    pub fn history_state(&self) -> HistoryState {
        self.inner.history.state()
    }

    pub fn subscribe_history(
        &self,
        observer: impl Fn(&HistoryEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.history.subscribe(observer)
    }

    pub fn history_stream(&self) -> HistoryStream {
        self.inner.history.stream()
    }

    pub fn intents(&self) -> IntentSender {
        self.inner.channel.sender()
    }

    pub fn subscribe_intents(
        &self,
        observer: impl Fn(&Intent) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.channel.subscribe(observer)
    }

    pub fn intent_stream(&self) -> IntentStream {
        self.inner.channel.stream()
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.lifecycle.is_unmounted()
    }

    /// Tear down: stop the pipeline, close the channel and cancel pending
    /// future-sourced actions. Later sends are dropped.
    pub fn unmount(&self) {
        self.inner.teardown();
    }
}

impl<V: View> fmt::Debug for Mounted<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("id", &self.inner.id)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
