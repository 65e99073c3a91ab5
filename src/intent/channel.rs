//! Hot, multicast intent channel with FIFO re-entrant delivery.
//!
//! `send` appends to a queue. Whoever finds the queue idle becomes the
//! drainer and delivers intents one at a time until the queue is empty.
//! A `send` issued during delivery (from an observer, or from another
//! thread) only enqueues, so follow-up intents are handled strictly after
//! the intent in flight and never interleaved with it.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Intent;
use crate::subscription::{EventStream, ObserverSet, Subscription};

pub type IntentStream = EventStream<Intent>;

struct QueueState {
    pending: VecDeque<Intent>,
    draining: bool,
    closed: bool,
}

struct ChannelInner {
    label: String,
    queue: Mutex<QueueState>,
    observers: ObserverSet<Intent>,
}

/// Resets the drain flag if an observer panics mid-delivery, so the channel
/// stays usable for later sends.
struct DrainGuard<'a> {
    queue: &'a Mutex<QueueState>,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.queue.lock().draining = false;
        }
    }
}

/// Per-instance intent channel. Cloning shares the channel.
#[derive(Clone)]
pub struct IntentChannel {
    inner: Arc<ChannelInner>,
}

impl IntentChannel {
    /// Create a channel. `label` identifies the owner in log output.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                label: label.into(),
                queue: Mutex::new(QueueState {
                    pending: VecDeque::new(),
                    draining: false,
                    closed: false,
                }),
                observers: ObserverSet::new(),
            }),
        }
    }

    /// Enqueue `intent` for every current subscriber.
    ///
    /// Never waits for subscribers: if another call is already delivering,
    /// the intent is picked up by that call after the current one.
    pub fn send(&self, intent: Intent) {
        {
            let mut queue = self.inner.queue.lock();
            if queue.closed {
                tracing::trace!(
                    channel = %self.inner.label,
                    intent = %intent.kind(),
                    "Intent dropped (channel closed)"
                );
                return;
            }
            queue.pending.push_back(intent);
            if queue.draining {
                return;
            }
            queue.draining = true;
        }
        self.drain();
    }

    fn drain(&self) {
        let mut guard = DrainGuard {
            queue: &self.inner.queue,
            armed: true,
        };
        loop {
            let next = {
                let mut queue = self.inner.queue.lock();
                match queue.pending.pop_front() {
                    Some(intent) => intent,
                    None => {
                        queue.draining = false;
                        guard.armed = false;
                        return;
                    }
                }
            };

            if self.inner.observers.is_empty() {
                tracing::trace!(
                    channel = %self.inner.label,
                    intent = %next.kind(),
                    "Intent dropped (no subscribers)"
                );
                continue;
            }

            tracing::debug!(
                channel = %self.inner.label,
                intent = %next.kind(),
                "Delivering intent"
            );
            self.inner.observers.notify(&next);
        }
    }

    /// Register an observer for intents sent from now on.
    pub fn subscribe(&self, observer: impl Fn(&Intent) + Send + Sync + 'static) -> Subscription {
        self.inner.observers.subscribe(observer)
    }

    /// Subscribe an async stream of intents sent from now on.
    pub fn stream(&self) -> IntentStream {
        self.inner.observers.stream()
    }

    /// Send-only handle.
    pub fn sender(&self) -> IntentSender {
        IntentSender {
            channel: self.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Stop accepting intents, discard undelivered ones and release every
    /// observer. Idempotent.
    pub fn close(&self) {
        let discarded = {
            let mut queue = self.inner.queue.lock();
            queue.closed = true;
            std::mem::take(&mut queue.pending).len()
        };
        self.inner.observers.clear();
        if discarded > 0 {
            tracing::debug!(
                channel = %self.inner.label,
                discarded,
                "Channel closed with undelivered intents"
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.queue.lock().closed
    }
}

/// Cheap send-only handle to an [`IntentChannel`].
#[derive(Clone)]
pub struct IntentSender {
    channel: IntentChannel,
}

impl IntentSender {
    pub fn send(&self, intent: Intent) {
        self.channel.send(intent);
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}
