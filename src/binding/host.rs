//! Mount root for connected views.
//!
//! The host carries engine configuration into every instance it mounts and
//! tears all of them down when it is dropped, the way removing a tree root
//! unmounts its children. Instances stay independent of each other: nothing
//! but configuration is shared.

use std::path::PathBuf;
use std::sync::Weak;

use parking_lot::Mutex;

use crate::binding::connect::Connected;
use crate::binding::instance::{InstanceId, Mounted, Teardown};
use crate::binding::view::View;
use crate::config::{ConfigStore, EngineConfig};
use crate::error::EngineError;
use crate::props::Props;

pub struct Host {
    config: ConfigStore,
    mounted: Mutex<Vec<(InstanceId, Weak<dyn Teardown>)>>,
}

impl Host {
    /// Host with a fixed, in-memory configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(ConfigStore::in_memory(config))
    }

    /// Host configured from the file at `path` (defaults when it is missing).
    pub fn open(path: PathBuf) -> Result<Self, EngineError> {
        Ok(Self::with_store(ConfigStore::open(path)?))
    }

    /// Use a shared store; each mount reads the config current at that time.
    pub fn with_store(config: ConfigStore) -> Self {
        Self {
            config,
            mounted: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Mount `connected` with externally supplied `props`.
    ///
    /// A boolean `history` prop enables backward/forward controls and is not
    /// passed to the view.
    pub fn mount<V: View>(&self, connected: &Connected<V>, props: Props) -> Mounted<V> {
        let instance = Mounted::mount(connected, props, &self.config.get());
        let mut mounted = self.mounted.lock();
        mounted.retain(|(_, handle)| handle.strong_count() > 0);
        mounted.push((instance.id(), instance.teardown_handle()));
        instance
    }

    /// Instances mounted here that are still alive and not unmounted.
    pub fn mounted_count(&self) -> usize {
        self.mounted
            .lock()
            .iter()
            .filter_map(|(_, handle)| handle.upgrade())
            .filter(|instance| !instance.is_torn_down())
            .count()
    }

    /// Unmount one instance by id. Returns false if it is not known here.
    pub fn unmount(&self, id: InstanceId) -> bool {
        let handle = {
            let mut mounted = self.mounted.lock();
            let position = mounted.iter().position(|(entry, _)| *entry == id);
            position.map(|index| mounted.remove(index).1)
        };
        match handle.and_then(|handle| handle.upgrade()) {
            Some(instance) => {
                instance.teardown();
                true
            }
            None => false,
        }
    }

    /// Unmount every instance mounted here.
    pub fn unmount_all(&self) {
        let handles = std::mem::take(&mut *self.mounted.lock());
        let count = handles.len();
        for (_, handle) in handles {
            if let Some(instance) = handle.upgrade() {
                instance.teardown();
            }
        }
        if count > 0 {
            tracing::debug!(count, "Host unmounted all instances");
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.unmount_all();
    }
}
