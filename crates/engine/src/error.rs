//! Error types for tag operations
//!
//! `WriteFailure` is the verdict of one run of the write protocol. The
//! variants separate failures that happened before anything touched the
//! tag (`Connect`, `Index`, `Format`, `Timeout`) from those that went
//! through the restore path (`Write`, `Restore`).

use nfctool_codec::{RecordError, ValidationError, WireError};
use nfctool_core::SessionError;
use nfctool_durability::BackupError;
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;
use crate::coordinator::WriteState;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for callers that do not care which layer failed
#[derive(Debug, Error)]
pub enum Error {
    /// Hardware channel failure
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Record encoding or decoding failure
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Message structure failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// NDEF binary format failure
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Backup persistence failure
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Write protocol failure
    #[error(transparent)]
    Write(#[from] WriteFailure),
}

/// Failure of a step that may run after the tag was touched
#[derive(Debug, Error)]
pub enum StepError {
    /// The tag session failed
    #[error("{0}")]
    Session(#[from] SessionError),

    /// The backup store failed
    #[error("{0}")]
    Backup(#[from] BackupError),
}

/// New content could not be turned into a valid message
#[derive(Debug, Error)]
pub enum FormatError {
    /// A text record could not be built
    #[error("{0}")]
    Record(#[from] RecordError),

    /// The built message breaks a message invariant
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// Why a write run did not complete
#[derive(Debug, Error)]
pub enum WriteFailure {
    /// The tag could not be opened; nothing was attempted
    #[error("Failed to connect to tag: {0}")]
    Connect(SessionError),

    /// The record index is out of range; nothing was written
    #[error("Record index {index} out of range for {len} records")]
    Index {
        /// Requested index
        index: usize,
        /// Number of records available
        len: usize,
    },

    /// The new content is not a valid message; nothing was written
    #[error("Invalid message format: {0}")]
    Format(FormatError),

    /// The run failed; the backup was written back, or no backup existed
    #[error("{}: {cause}", restore_note(.failed_at, .restored))]
    Write {
        /// What went wrong
        cause: StepError,
        /// Last state reached before the failure: `Connected` when reading
        /// or backing up failed, `Validated` when the write itself failed
        failed_at: WriteState,
        /// True if a backup was written back to the tag
        restored: bool,
    },

    /// The run failed and so did the restore
    #[error("{} failed and restore failed, original content may or may not be intact: {cause}; restore: {restore_error}", step_name(.failed_at))]
    Restore {
        /// What went wrong first
        cause: StepError,
        /// Last state reached before the failure
        failed_at: WriteState,
        /// Why the restore failed
        restore_error: StepError,
    },

    /// The session deadline expired before a hardware step
    #[error("Session timed out after {}ms before {before}", millis(.elapsed))]
    Timeout {
        /// Time spent since the run started
        elapsed: Duration,
        /// State the run was about to enter
        before: WriteState,
    },
}

fn step_name(failed_at: &WriteState) -> &'static str {
    match failed_at {
        WriteState::Idle | WriteState::Connected => "Backup",
        _ => "Write",
    }
}

fn restore_note(failed_at: &WriteState, restored: &bool) -> &'static str {
    match (step_name(failed_at), *restored) {
        ("Backup", true) => "Backup failed before writing, previous backup written back",
        ("Backup", false) => "Backup failed before writing, tag left untouched",
        (_, true) => "Write failed, original content restored",
        (_, false) => "Write failed, no backup to restore",
    }
}

fn millis(elapsed: &Duration) -> u128 {
    elapsed.as_millis()
}

/// Category of a [`WriteFailure`], for callers that only branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// See [`WriteFailure::Connect`]
    Connect,
    /// See [`WriteFailure::Index`]
    Index,
    /// See [`WriteFailure::Format`]
    Format,
    /// See [`WriteFailure::Write`]
    Write,
    /// See [`WriteFailure::Restore`]
    Restore,
    /// See [`WriteFailure::Timeout`]
    Timeout,
}

impl WriteFailure {
    /// Category of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            WriteFailure::Connect(_) => FailureKind::Connect,
            WriteFailure::Index { .. } => FailureKind::Index,
            WriteFailure::Format(_) => FailureKind::Format,
            WriteFailure::Write { .. } => FailureKind::Write,
            WriteFailure::Restore { .. } => FailureKind::Restore,
            WriteFailure::Timeout { .. } => FailureKind::Timeout,
        }
    }

    /// True if the failure happened before any write reached the tag
    pub fn is_before_mutation(&self) -> bool {
        match self {
            WriteFailure::Write {
                failed_at,
                restored,
                ..
            } => !restored && step_name(failed_at) == "Backup",
            _ => matches!(
                self.kind(),
                FailureKind::Connect | FailureKind::Index | FailureKind::Format | FailureKind::Timeout
            ),
        }
    }
}
