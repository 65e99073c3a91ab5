use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Mount/unmount state of one instance.
pub struct Lifecycle {
    unmounted: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            unmounted: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Mark the instance unmounted and wake every waiter.
    /// Returns true only for the call that performed the transition.
    pub fn signal_unmount(&self) -> bool {
        if !self.unmounted.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
            return true;
        }
        false
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    /// Create a handle for pending work that must stop on unmount.
    pub fn handle(&self) -> LifecycleHandle {
        LifecycleHandle {
            unmounted: Arc::clone(&self.unmounted),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Lightweight handle for observing unmount
#[derive(Clone)]
pub struct LifecycleHandle {
    unmounted: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl LifecycleHandle {
    pub fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    /// Resolve once the instance is unmounted.
    pub async fn wait(&self) {
        // Register with Notify before checking the flag; otherwise an unmount
        // landing between the check and the await would be missed.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_unmounted() {
            return;
        }
        notified.await;
    }
}
