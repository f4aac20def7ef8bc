//! Backup slot persistence
//!
//! A backup is the NDEF binary form of a message, carried as base64 text so
//! any key/value store can hold it. Entries are addressed by a logical key
//! that the engine fixes per manager instance.

mod file;
mod memory;

pub use file::{FileBackupStore, StoredEntry};
pub use memory::MemoryBackupStore;

use base64::{engine::general_purpose, Engine as _};
use nfctool_codec::{wire, WireError};
use nfctool_core::NdefMessage;
use std::io;
use thiserror::Error;

/// Result type alias for backup operations
pub type BackupResult<T> = std::result::Result<T, BackupError>;

/// Errors from backup persistence
#[derive(Debug, Error)]
pub enum BackupError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Backup document could not be parsed or serialized
    #[error("Backup document error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored text is not valid base64
    #[error("Invalid base64 in backup entry: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Stored bytes are not a valid NDEF message
    #[error("Invalid backup contents: {0}")]
    Wire(#[from] WireError),

    /// Stored bytes do not match their checksum
    #[error("Checksum mismatch for backup '{key}': expected {expected:08x}, computed {computed:08x}")]
    Checksum {
        /// Logical key of the corrupted entry
        key: String,
        /// CRC32 recorded at save time
        expected: u32,
        /// CRC32 of the bytes found on disk
        computed: u32,
    },
}

/// Persistence for backed-up messages
///
/// Implementations are shared between the thread driving tag events and
/// whatever owns the manager, so they must be `Send + Sync`.
pub trait BackupStore: Send + Sync {
    /// Store `message` under `key`, replacing any previous entry
    fn save(&self, key: &str, message: &NdefMessage) -> BackupResult<()>;

    /// Load the message stored under `key`
    ///
    /// Returns `Ok(None)` if nothing is stored.
    fn load(&self, key: &str) -> BackupResult<Option<NdefMessage>>;

    /// Delete the entry under `key`
    ///
    /// Returns true if an entry existed.
    fn remove(&self, key: &str) -> BackupResult<bool>;

    /// True if an entry exists under `key`
    fn contains(&self, key: &str) -> BackupResult<bool> {
        Ok(self.load(key)?.is_some())
    }
}

/// Encode a message as base64 of its NDEF binary form
///
/// # Errors
///
/// Propagates wire encoding errors, including `InvalidEmptyRecord` for an
/// empty record that carries data.
pub fn encode_backup(message: &NdefMessage) -> BackupResult<String> {
    let bytes = wire::encode_message(message)?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Inverse of [`encode_backup`]
pub fn decode_backup(text: &str) -> BackupResult<NdefMessage> {
    let bytes = general_purpose::STANDARD.decode(text)?;
    Ok(wire::decode_message(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfctool_codec::encode_text;

    #[test]
    fn test_encode_decode_backup() {
        let message = NdefMessage::new(vec![
            encode_text("FI0047|:|102", "en").unwrap(),
            encode_text("second", "fr").unwrap(),
        ]);
        let text = encode_backup(&message).unwrap();
        assert!(text.is_ascii());
        assert_eq!(decode_backup(&text).unwrap(), message);
    }

    #[test]
    fn test_empty_message_encodes_to_empty_text() {
        let text = encode_backup(&NdefMessage::default()).unwrap();
        assert_eq!(text, "");
        assert!(decode_backup(&text).unwrap().is_empty());
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            decode_backup("not base64!"),
            Err(BackupError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_invalid_wire() {
        // "AA==" is a single zero byte: no message-begin flag
        assert!(matches!(decode_backup("AA=="), Err(BackupError::Wire(_))));
    }

    #[test]
    fn test_checksum_display() {
        let err = BackupError::Checksum {
            key: "myTag".into(),
            expected: 0xdeadbeef,
            computed: 0x1,
        };
        let msg = err.to_string();
        assert!(msg.contains("myTag"));
        assert!(msg.contains("deadbeef"));
        assert!(msg.contains("00000001"));
    }
}
