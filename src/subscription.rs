//! Observer registries shared by the intent channel and the history store.
//!
//! Observers are plain callbacks registered with an [`ObserverSet`]. Each
//! registration returns a [`Subscription`] guard that unregisters the
//! callback when dropped. Notification snapshots the observer list first and
//! calls the callbacks without holding the registry lock, so an observer may
//! subscribe, unsubscribe or send more events while being notified.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ObserverList<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Multicast callback registry. Cloning shares the registry.
pub(crate) struct ObserverSet<T> {
    inner: Arc<Mutex<ObserverList<T>>>,
}

impl<T> Clone for ObserverSet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> ObserverSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub(crate) fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut list = self.inner.lock();
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Arc::new(observer)));
            id
        };

        let weak: Weak<Mutex<ObserverList<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(list) = weak.upgrade() {
                list.lock().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Deliver `value` to every observer registered at the time of the call,
    /// in registration order.
    pub(crate) fn notify(&self, value: &T) {
        let observers: Vec<Callback<T>> = {
            let list = self.inner.lock();
            list.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for observer in observers {
            observer(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub(crate) fn clear(&self) {
        self.inner.lock().entries.clear();
    }
}

impl<T: Clone + Send + 'static> ObserverSet<T> {
    /// Subscribe an unbounded tokio channel and wrap its receiver.
    pub(crate) fn stream(&self) -> EventStream<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |value: &T| {
            // Receiver gone means the stream was dropped; the subscription
            // is about to be released with it.
            let _ = tx.send(value.clone());
        });
        EventStream {
            rx,
            _subscription: subscription,
        }
    }
}

/// RAII guard: dropping it removes the observer before the next notification.
#[must_use = "dropping a Subscription unregisters the observer immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Explicitly unregister. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Live feed of events received after subscription (no replay).
///
/// Holds its subscription; dropping the stream unsubscribes.
pub struct EventStream<T> {
    rx: mpsc::UnboundedReceiver<T>,
    _subscription: Subscription,
}

impl<T> EventStream<T> {
    /// Wait for the next event. `None` once the source is gone.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Collect the next `n` events. Returns fewer if the source closes.
    pub async fn take(&mut self, n: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            match self.rx.recv().await {
                Some(value) => out.push(value),
                None => break,
            }
        }
        out
    }

    /// Wait for `n` events and return the last of them.
    pub async fn take_last(&mut self, n: usize) -> Option<T> {
        self.take(n).await.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn observers_notified_in_registration_order() {
        let set = ObserverSet::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = {
            let seen = Arc::clone(&seen);
            set.subscribe(move |v| seen.lock().push(("a", *v)))
        };
        let b = {
            let seen = Arc::clone(&seen);
            set.subscribe(move |v| seen.lock().push(("b", *v)))
        };
        set.notify(&7);
        assert_eq!(*seen.lock(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let set = ObserverSet::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = {
            let hits = Arc::clone(&hits);
            set.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        set.notify(&1);
        drop(sub);
        set.notify(&2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn observer_may_unsubscribe_others_while_notified() {
        let set = ObserverSet::<u32>::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let first = {
            let slot = Arc::clone(&slot);
            set.subscribe(move |_| {
                slot.lock().take();
            })
        };
        *slot.lock() = Some(set.subscribe(|_| {}));
        set.notify(&1);
        assert_eq!(set.len(), 1);
        first.unsubscribe();
        assert_eq!(set.len(), 0);
    }

    #[tokio::test]
    async fn stream_receives_only_later_events() {
        let set = ObserverSet::<u32>::new();
        set.notify(&0);
        let mut stream = set.stream();
        set.notify(&1);
        set.notify(&2);
        assert_eq!(stream.take(2).await, vec![1, 2]);
        assert!(stream.try_next().is_none());
        drop(stream);
        assert_eq!(set.len(), 0);
    }
}
