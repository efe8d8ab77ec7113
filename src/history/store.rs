//! Durable persistence for the conversation collection.
//!
//! The whole collection lives in a single named slot holding a JSON array.
//! Reads treat anything unreadable as "no prior state"; writes are
//! best-effort and surface failures as [`StoreError`] for the caller to
//! log and ignore.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::error::StoreError;
use super::types::Conversation;

/// File name of the default durable slot inside the data directory.
const SLOT_FILE_NAME: &str = "conversations.json";

/// A durable key-value slot holding one opaque string payload.
///
/// The core never retries or re-reads mid-session; in-memory state stays
/// authoritative once loaded.
pub trait StateSlot: Send + Sync {
    /// `None` when the slot has never been written (or is unreadable).
    fn read(&self) -> Option<String>;
    fn write(&self, payload: &str) -> Result<(), StoreError>;
}

/// Slot backed by a single JSON file.
#[derive(Debug)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Slot at the conventional location under the app data directory.
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let dir = crate::services::paths::data_dir()?;
        Ok(Self::new(dir.join(SLOT_FILE_NAME)))
    }
}

impl StateSlot for FileSlot {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&self, payload: &str) -> Result<(), StoreError> {
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-memory slot for tests and embedders without durable storage.
#[derive(Debug, Default)]
pub struct MemorySlot {
    cell: Mutex<Option<String>>,
}

impl MemorySlot {
    /// Current raw payload, if any. Test hook.
    pub fn snapshot(&self) -> Option<String> {
        self.cell.lock().ok().and_then(|cell| cell.clone())
    }
}

impl StateSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.snapshot()
    }

    fn write(&self, payload: &str) -> Result<(), StoreError> {
        let mut cell = self
            .cell
            .lock()
            .map_err(|_| StoreError::io("Memory slot lock poisoned"))?;
        *cell = Some(payload.to_string());
        Ok(())
    }
}

/// Serializes the conversation collection in and out of a [`StateSlot`],
/// enforcing the retention cap on the way out.
pub struct ConvoStore {
    slot: Arc<dyn StateSlot>,
    max_retained: usize,
}

impl ConvoStore {
    pub fn new(slot: Arc<dyn StateSlot>, max_retained: usize) -> Self {
        Self { slot, max_retained }
    }

    /// Read the slot. Absent slot means a fresh start; a corrupt payload
    /// is logged and treated the same way, never as a fatal error.
    pub fn load(&self) -> Vec<Conversation> {
        let Some(raw) = self.slot.read() else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Conversation>>(&raw) {
            Ok(conversations) => conversations,
            Err(err) => {
                log::warn!("Conversation slot unreadable, starting empty: {}", err);
                Vec::new()
            }
        }
    }

    /// Serialize the first `max_retained` conversations into the slot.
    pub fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError> {
        let retained = &conversations[..conversations.len().min(self.max_retained)];
        let payload = serde_json::to_string(retained)?;
        self.slot.write(&payload)
    }
}

#[cfg(test)]
pub(crate) struct FailingSlot;

#[cfg(test)]
impl StateSlot for FailingSlot {
    fn read(&self) -> Option<String> {
        None
    }

    fn write(&self, _payload: &str) -> Result<(), StoreError> {
        Err(StoreError::io("quota exceeded"))
    }
}
