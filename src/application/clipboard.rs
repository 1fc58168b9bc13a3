//! Shared clipboard capability.
//!
//! One slot per host process, injected into every document. Overwritten on
//! copy, read (not cleared) on paste; last writer wins across windows.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::record::NodeRecord;

/// Cloneable handle to the shared subtree slot.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Arc<Mutex<Option<NodeRecord>>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents.
    pub fn put(&self, record: NodeRecord) {
        *self.lock() = Some(record);
    }

    /// Copy of the slot contents, if any.
    pub fn get(&self) -> Option<NodeRecord> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    // A poisoned lock only means another holder panicked mid-write; the
    // slot stays usable under last-writer-wins.
    fn lock(&self) -> MutexGuard<'_, Option<NodeRecord>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
