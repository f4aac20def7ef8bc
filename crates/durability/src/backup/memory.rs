//! In-memory backup store

use std::collections::HashMap;

use nfctool_core::NdefMessage;
use parking_lot::Mutex;

use super::{decode_backup, encode_backup, BackupResult, BackupStore};

/// Backup store that lives as long as the process
///
/// Entries are kept in their encoded text form, exactly as a key/value
/// preference store would hold them.
#[derive(Debug, Default)]
pub struct MemoryBackupStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackupStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Encoded text stored under `key`
    pub fn raw_entry(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl BackupStore for MemoryBackupStore {
    fn save(&self, key: &str, message: &NdefMessage) -> BackupResult<()> {
        let text = encode_backup(message)?;
        self.entries.lock().insert(key.to_string(), text);
        Ok(())
    }

    fn load(&self, key: &str) -> BackupResult<Option<NdefMessage>> {
        let text = match self.entries.lock().get(key) {
            Some(text) => text.clone(),
            None => return Ok(None),
        };
        decode_backup(&text).map(Some)
    }

    fn remove(&self, key: &str) -> BackupResult<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn contains(&self, key: &str) -> BackupResult<bool> {
        Ok(self.entries.lock().contains_key(key))
    }
}
