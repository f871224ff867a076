use super::{ChangeEvent, ChangeListener};
use log::trace;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Handle returned by [`ChangeHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// In-process registry of change listeners.
#[derive(Default)]
pub struct ChangeHub {
    listeners: RwLock<BTreeMap<SubscriptionId, Arc<dyn ChangeListener>>>,
    next_id: AtomicU64,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it receives every event published afterwards.
    pub fn subscribe(&self, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write_listeners().insert(id, listener);
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.write_listeners().remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Delivers `event` to all listeners in subscription order.
    pub fn publish(&self, event: ChangeEvent) {
        trace!(
            "event=change_publish module=feed kind={:?} index={}",
            event.kind,
            event.index
        );
        // Listeners run outside the lock so they may subscribe or unsubscribe.
        for listener in self.snapshot() {
            listener.on_change(&event);
        }
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = ChangeEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn ChangeListener>> {
        let guard = match self.listeners.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.values().cloned().collect()
    }

    fn write_listeners(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, BTreeMap<SubscriptionId, Arc<dyn ChangeListener>>> {
        match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
