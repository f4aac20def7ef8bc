//! Tag write coordinator
//!
//! Runs the backup-modify-validate-write-restore protocol against one tag
//! session:
//!
//! ```text
//! Idle -> Connected -> BackedUp -> Modified -> Validated -> Written -> Closed
//!            |            |           |           |
//!            +------------+-----------+-----------+--> RestoreAttempted -> Closed
//! ```
//!
//! Rules:
//! - `close()` is called exactly once on every exit path after `connect`
//!   was attempted; a close error is recorded and never replaces the verdict
//! - Index and format failures happen before anything is written, so they
//!   skip the restore
//! - A read, backup or write failure writes the stored backup back, if any;
//!   a failed restore is reported, never raised
//! - The session deadline is checked before each hardware step after
//!   connect. A blocking call in flight is not interrupted.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nfctool_codec::message;
use nfctool_core::{SessionError, TagSession};
use nfctool_durability::BackupStore;
use tracing::{debug, error, info, warn};

use crate::config::NfcConfig;
use crate::error::{FailureKind, FormatError, StepError, WriteFailure};

/// Protocol state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteState {
    /// Nothing attempted
    Idle,
    /// Session open
    Connected,
    /// Current content saved to the backup store
    BackedUp,
    /// Target text replaced in the working copy
    Modified,
    /// New message built and validated
    Validated,
    /// New message on the tag
    Written,
    /// Backup written back after a failure
    RestoreAttempted,
    /// Session released
    Closed,
}

impl fmt::Display for WriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What happened to the backup after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The backup was written back
    Restored,
    /// No backup existed for the logical key
    NoBackup,
    /// Loading or writing the backup failed
    Failed,
}

/// Result of one write run
#[derive(Debug)]
pub struct WriteReport {
    /// Verdict
    pub outcome: Result<(), WriteFailure>,
    /// States entered, in order
    pub path: Vec<WriteState>,
    /// Restore result, if a restore was attempted
    pub restore: Option<RestoreOutcome>,
    /// Close failure, if any; never part of the verdict
    pub close_error: Option<SessionError>,
}

impl WriteReport {
    /// True if the new content is on the tag
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Failure category, None on success
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.outcome.as_ref().err().map(WriteFailure::kind)
    }

    /// True if the run passed through `state`
    pub fn visited(&self, state: WriteState) -> bool {
        self.path.contains(&state)
    }
}

/// Mutable bookkeeping of one run
struct Run {
    started: Instant,
    path: Vec<WriteState>,
    restore: Option<RestoreOutcome>,
}

impl Run {
    fn enter(&mut self, state: WriteState) {
        debug!(target: "nfctool::write", %state, "Entering state");
        self.path.push(state);
    }
}

/// Drives the write protocol
///
/// One coordinator serves any number of sequential runs; it holds no
/// per-run state.
pub struct TagWriteCoordinator {
    store: Arc<dyn BackupStore>,
    backup_key: String,
    language_code: String,
    session_timeout: Duration,
}

impl TagWriteCoordinator {
    /// Create a coordinator from configuration
    pub fn new(config: &NfcConfig, store: Arc<dyn BackupStore>) -> Self {
        Self {
            store,
            backup_key: config.backup_key.clone(),
            language_code: config.language_code.clone(),
            session_timeout: config.session_timeout(),
        }
    }

    /// Override the session deadline
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Logical key of the backup slot
    pub fn backup_key(&self) -> &str {
        &self.backup_key
    }

    /// Replace `texts[index]` with `new_text` and write all texts to the tag
    /// as text records.
    ///
    /// Never fails: the verdict and everything that happened on the way are
    /// in the returned report.
    pub fn write(
        &self,
        session: &mut dyn TagSession,
        texts: &[String],
        index: usize,
        new_text: &str,
    ) -> WriteReport {
        let mut run = Run {
            started: Instant::now(),
            path: vec![WriteState::Idle],
            restore: None,
        };

        let outcome = self.drive(session, texts, index, new_text, &mut run);

        let close_error = match session.close() {
            Ok(()) => None,
            Err(e) => {
                warn!(target: "nfctool::write", error = %e, "Failed to close tag");
                Some(e)
            }
        };
        run.enter(WriteState::Closed);

        match &outcome {
            Ok(()) => info!(target: "nfctool::write", index, records = texts.len(), "Tag written"),
            Err(e) => error!(target: "nfctool::write", index, kind = ?e.kind(), error = %e, "Tag write failed"),
        }

        WriteReport {
            outcome,
            path: run.path,
            restore: run.restore,
            close_error,
        }
    }

    fn drive(
        &self,
        session: &mut dyn TagSession,
        texts: &[String],
        index: usize,
        new_text: &str,
        run: &mut Run,
    ) -> Result<(), WriteFailure> {
        // Idle -> Connected
        session.connect().map_err(WriteFailure::Connect)?;
        run.enter(WriteState::Connected);

        // Connected -> BackedUp
        self.check_deadline(run, WriteState::BackedUp)?;
        if let Err(cause) = self.back_up(session) {
            return Err(self.restore(session, cause, run));
        }
        run.enter(WriteState::BackedUp);

        // BackedUp -> Modified
        if index >= texts.len() {
            return Err(WriteFailure::Index {
                index,
                len: texts.len(),
            });
        }
        let mut updated = texts.to_vec();
        updated[index] = new_text.to_string();
        run.enter(WriteState::Modified);

        // Modified -> Validated
        let new_message = message::encode(&updated, &self.language_code)
            .map_err(|e| WriteFailure::Format(FormatError::from(e)))?;
        message::validate(&new_message).map_err(|e| WriteFailure::Format(FormatError::from(e)))?;
        run.enter(WriteState::Validated);

        // Validated -> Written
        self.check_deadline(run, WriteState::Written)?;
        debug!(target: "nfctool::write", records = new_message.len(), "Writing message");
        if let Err(e) = session.write_message(&new_message) {
            return Err(self.restore(session, StepError::Session(e), run));
        }
        run.enter(WriteState::Written);
        Ok(())
    }

    fn back_up(&self, session: &mut dyn TagSession) -> Result<(), StepError> {
        match session.read_cached_message()? {
            Some(current) => {
                self.store.save(&self.backup_key, &current)?;
                debug!(target: "nfctool::write", records = current.len(), "Backed up tag content");
            }
            None => debug!(target: "nfctool::write", "Tag reports no content, nothing to back up"),
        }
        Ok(())
    }

    fn restore(&self, session: &mut dyn TagSession, cause: StepError, run: &mut Run) -> WriteFailure {
        let failed_at = run.path.last().copied().unwrap_or(WriteState::Idle);
        warn!(target: "nfctool::write", error = %cause, %failed_at, "Attempting to restore backup");
        run.enter(WriteState::RestoreAttempted);

        let attempt = self
            .store
            .load(&self.backup_key)
            .map_err(StepError::from)
            .and_then(|backup| match backup {
                Some(original) => session
                    .write_message(&original)
                    .map(|()| RestoreOutcome::Restored)
                    .map_err(StepError::from),
                None => Ok(RestoreOutcome::NoBackup),
            });

        match attempt {
            Ok(outcome) => {
                run.restore = Some(outcome);
                WriteFailure::Write {
                    cause,
                    failed_at,
                    restored: outcome == RestoreOutcome::Restored,
                }
            }
            Err(restore_error) => {
                error!(target: "nfctool::write", error = %restore_error, "Failed to restore original message");
                run.restore = Some(RestoreOutcome::Failed);
                WriteFailure::Restore {
                    cause,
                    failed_at,
                    restore_error,
                }
            }
        }
    }

    fn check_deadline(&self, run: &Run, before: WriteState) -> Result<(), WriteFailure> {
        let elapsed = run.started.elapsed();
        if elapsed >= self.session_timeout {
            return Err(WriteFailure::Timeout { elapsed, before });
        }
        Ok(())
    }
}
