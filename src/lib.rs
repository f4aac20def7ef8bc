//! nfctool - NDEF record codec and safe tag rewrite protocol
//!
//! nfctool turns the raw records read from an NFC tag into typed content
//! and rewrites a tag's text records in place without losing its previous
//! content when the radio link fails mid-write.
//!
//! # Quick Start
//!
//! ```ignore
//! use nfctool::{NfcConfig, TagManager};
//!
//! let manager = TagManager::from_config(NfcConfig::default())?;
//!
//! // `tag` is any `TagHandle` implementation
//! let texts = manager.read_from_tag(&mut tag);
//! let report = manager.write_to_tag(&mut tag, &texts, 0, "FI0047|:|103");
//! if let Err(failure) = report.outcome {
//!     eprintln!("{}", failure);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`model`]: Data model, session errors and the tag capability traits
//! - [`codec`]: Record, message and NDEF binary codecs
//! - [`durability`]: Backup slot persistence
//! - [`engine`]: Probe, write coordinator, diagnostics, manager, config

pub use nfctool_codec as codec;
pub use nfctool_core as model;
pub use nfctool_durability as durability;
pub use nfctool_engine as engine;

pub use nfctool_codec::{ParsedRecord, RecordError, ValidationError, WireError};
pub use nfctool_core::{
    NdefMessage, RawRecord, SessionError, TagHandle, TagSession, TagTechnology, Tnf,
};
pub use nfctool_durability::{BackupError, BackupStore, FileBackupStore, MemoryBackupStore};
pub use nfctool_engine::{
    DiscoveryAction, DiscoveryOutcome, Error, FailureKind, LogProfile, NfcConfig, PendingWrite,
    ProductTag, Result, TagDiscovery, TagManager, UnknownTagReport, WriteFailure, WriteReport,
    WriteState,
};
