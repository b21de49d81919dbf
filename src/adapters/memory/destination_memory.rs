//! In-memory intended-destination slot.

use std::sync::Mutex;

use crate::ports::DestinationMemory;

/// Process-local single slot. One instance per browser session.
#[derive(Debug, Default)]
pub struct InMemoryDestinationMemory {
    slot: Mutex<Option<String>>,
}

impl InMemoryDestinationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> R {
        // A poisoned slot still holds a valid Option.
        let mut guard = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl DestinationMemory for InMemoryDestinationMemory {
    fn remember(&self, path: &str) {
        self.with_slot(|slot| *slot = Some(path.to_string()));
    }

    fn peek(&self) -> Option<String> {
        self.with_slot(|slot| slot.clone())
    }

    fn take(&self) -> Option<String> {
        self.with_slot(Option::take)
    }
}
