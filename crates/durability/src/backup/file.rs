//! File-backed backup store
//!
//! # Layout
//!
//! One JSON document holds every entry:
//!
//! ```text
//! {
//!   "version": 1,
//!   "entries": {
//!     "myTag": { "data": "<base64>", "crc32": 1234, "saved_at_micros": 0 }
//!   }
//! }
//! ```
//!
//! `crc32` covers the decoded NDEF bytes, so damage to `data` is caught
//! on load even when it still decodes as base64.
//!
//! # Crash Safety
//!
//! Every mutation rewrites the whole document:
//! 1. Write to a temporary file (`.<name>.tmp`) in the same directory
//! 2. fsync the temporary file
//! 3. Atomic rename over the document
//! 4. fsync the parent directory
//!
//! Either the previous or the new document is visible after a crash, never
//! a partial one.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose, Engine as _};
use nfctool_codec::wire;
use nfctool_core::NdefMessage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{BackupError, BackupResult, BackupStore};

/// Current document format version
const DOCUMENT_VERSION: u32 = 1;

/// One stored backup as it appears in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Base64 of the NDEF binary message
    pub data: String,
    /// CRC32 of the decoded bytes
    pub crc32: u32,
    /// Save time, microseconds since the Unix epoch
    pub saved_at_micros: u64,
}

#[derive(Debug, Deserialize)]
struct BackupDocument {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, StoredEntry>,
}

#[derive(Serialize)]
struct BackupDocumentRef<'a> {
    version: u32,
    entries: &'a BTreeMap<String, StoredEntry>,
}

/// Backup store persisted as a JSON document
///
/// The document is read once at [`open`](Self::open); afterwards the
/// in-memory view is authoritative and every mutation is written through.
#[derive(Debug)]
pub struct FileBackupStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

impl FileBackupStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A missing or empty file is an empty store. A stale temporary file
    /// from an interrupted write is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// backup document.
    pub fn open(path: impl Into<PathBuf>) -> BackupResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => {
                let document: BackupDocument = serde_json::from_slice(&bytes)?;
                if document.version != DOCUMENT_VERSION {
                    warn!(
                        target: "nfctool::backup",
                        version = document.version,
                        "Unexpected backup document version, reading anyway"
                    );
                }
                document.entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let store = FileBackupStore {
            path,
            entries: Mutex::new(entries),
        };

        match fs::remove_file(store.temp_path()) {
            Ok(()) => debug!(target: "nfctool::backup", "Removed stale temporary backup file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(
            target: "nfctool::backup",
            path = %store.path.display(),
            entries = store.entries.lock().len(),
            "Opened backup store"
        );
        Ok(store)
    }

    /// Path of the backup document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored entry for `key`, without decoding it
    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.entries.lock().get(key).cloned()
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "backup".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    fn persist(&self, entries: &BTreeMap<String, StoredEntry>) -> BackupResult<()> {
        let document = BackupDocumentRef {
            version: DOCUMENT_VERSION,
            entries,
        };
        let bytes = serde_json::to_vec_pretty(&document)?;
        let temp_path = self.temp_path();

        // Step 1: Write to temporary file
        let mut file = File::create(&temp_path)?;
        file.write_all(&bytes)?;

        // Step 2: fsync the file
        file.sync_all()?;
        drop(file);

        // Step 3: Atomic rename
        fs::rename(&temp_path, &self.path)?;

        // Step 4: fsync parent directory
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }
}

impl BackupStore for FileBackupStore {
    fn save(&self, key: &str, message: &NdefMessage) -> BackupResult<()> {
        let bytes = wire::encode_message(message)?;
        let entry = StoredEntry {
            data: general_purpose::STANDARD.encode(&bytes),
            crc32: crc32fast::hash(&bytes),
            saved_at_micros: now_micros(),
        };

        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), entry);
        self.persist(&next)?;
        *entries = next;

        debug!(
            target: "nfctool::backup",
            key,
            records = message.len(),
            bytes = bytes.len(),
            "Saved backup"
        );
        Ok(())
    }

    fn load(&self, key: &str) -> BackupResult<Option<NdefMessage>> {
        let entry = match self.entry(key) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let bytes = general_purpose::STANDARD.decode(&entry.data)?;
        let computed = crc32fast::hash(&bytes);
        if computed != entry.crc32 {
            return Err(BackupError::Checksum {
                key: key.to_string(),
                expected: entry.crc32,
                computed,
            });
        }
        Ok(Some(wire::decode_message(&bytes)?))
    }

    fn remove(&self, key: &str) -> BackupResult<bool> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;

        debug!(target: "nfctool::backup", key, "Removed backup");
        Ok(true)
    }

    fn contains(&self, key: &str) -> BackupResult<bool> {
        Ok(self.entries.lock().contains_key(key))
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfctool_codec::encode_text;
    use tempfile::TempDir;

    fn message(text: &str) -> NdefMessage {
        NdefMessage::new(vec![encode_text(text, "en").unwrap()])
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileBackupStore::open(dir.path().join("backup.json")).unwrap();
        assert!(store.keys().is_empty());
        assert_eq!(store.load("myTag").unwrap(), None);
        // Nothing is written until the first mutation
        assert!(!store.path().exists());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("backup.json");
        let store = FileBackupStore::open(&path).unwrap();
        store.save("myTag", &message("x")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, b"").unwrap();
        let store = FileBackupStore::open(&path).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_open_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            FileBackupStore::open(&path),
            Err(BackupError::Json(_))
        ));
    }

    #[test]
    fn test_save_writes_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");
        let store = FileBackupStore::open(&path).unwrap();
        store.save("myTag", &message("hello")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"version\": 1"));
        assert!(text.contains("\"myTag\""));
        assert!(text.contains("\"crc32\""));

        let entry = store.entry("myTag").unwrap();
        assert!(entry.saved_at_micros > 0);
        assert!(!dir.path().join(".backup.json.tmp").exists());
    }

    #[test]
    fn test_remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");
        {
            let store = FileBackupStore::open(&path).unwrap();
            store.save("myTag", &message("hello")).unwrap();
            assert!(store.remove("myTag").unwrap());
            assert!(!store.remove("myTag").unwrap());
        }
        let store = FileBackupStore::open(&path).unwrap();
        assert!(!store.contains("myTag").unwrap());
    }

    #[test]
    fn test_stale_temp_file_removed() {
        let dir = TempDir::new().unwrap();
        let temp = dir.path().join(".backup.json.tmp");
        fs::write(&temp, b"partial").unwrap();

        let _store = FileBackupStore::open(dir.path().join("backup.json")).unwrap();
        assert!(!temp.exists());
    }

    #[test]
    fn test_checksum_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = FileBackupStore::open(dir.path().join("backup.json")).unwrap();
        store.save("myTag", &message("hello")).unwrap();

        {
            let mut entries = store.entries.lock();
            let entry = entries.get_mut("myTag").unwrap();
            entry.crc32 ^= 1;
        }

        assert!(matches!(
            store.load("myTag"),
            Err(BackupError::Checksum { ref key, .. }) if key == "myTag"
        ));
    }
}
