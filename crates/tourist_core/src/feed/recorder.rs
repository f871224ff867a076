use super::{ChangeEvent, ChangeListener};
use std::sync::Mutex;

/// Listener that buffers events until a consumer polls them.
#[derive(Default)]
pub struct ChangeRecorder {
    events: Mutex<Vec<ChangeEvent>>,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes all buffered events, oldest first.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl ChangeListener for ChangeRecorder {
    fn on_change(&self, event: &ChangeEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
