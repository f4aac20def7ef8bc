//! Durability layer for nfctool
//!
//! This crate owns the single thing nfctool keeps across tag sessions: the
//! backup slot holding the last message read from (or about to be
//! overwritten on) a tag.
//!
//! - BackupStore: The persistence seam used by the write coordinator
//! - MemoryBackupStore: Process-local store
//! - FileBackupStore: JSON document on disk with CRC-checked entries and
//!   crash-safe replacement

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup;

pub use backup::{
    decode_backup, encode_backup, BackupError, BackupResult, BackupStore, FileBackupStore,
    MemoryBackupStore, StoredEntry,
};
