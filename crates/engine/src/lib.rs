//! Tag engine for nfctool
//!
//! This crate orchestrates the lower layers against a physical tag:
//! - Probe: Technology-specific writability checks
//! - Coordinator: Backup-modify-validate-write-restore protocol
//! - Diagnostics: Reports for tags without text content
//! - Manager: The tag operations callers use
//! - Discovery: Routing of tag discovery events
//! - Config and logging setup
//!
//! The engine is the only component that knows about:
//! - The backup slot's logical key
//! - Session deadlines
//! - Cross-layer coordination (tag session + codec + backup store)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod content;
pub mod coordinator;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod manager;
pub mod probe;
pub mod testing;

pub use config::{ConfigError, NfcConfig, CONFIG_FILE_NAME, DEFAULT_BACKUP_KEY};
pub use content::{ProductFields, ProductTag, FIELD_SEPARATOR};
pub use coordinator::{RestoreOutcome, TagWriteCoordinator, WriteReport, WriteState};
pub use diagnostics::{dump_tag, reversed_hex, tag_id_hex, unknown_tag_report, UnknownTagReport};
pub use discovery::{event_texts, DiscoveryAction, DiscoveryOutcome, PendingWrite, TagDiscovery};
pub use error::{Error, FailureKind, FormatError, Result, StepError, WriteFailure};
pub use logging::LogProfile;
pub use manager::TagManager;
pub use probe::ProbeStrategy;
