//! Tag manager
//!
//! Entry point for callers holding a discovered tag. Owns the backup slot
//! and the write coordinator and exposes the four tag operations.

use std::sync::Arc;
use std::time::Instant;

use nfctool_codec::message;
use nfctool_core::{NdefMessage, SessionError, TagHandle, TagSession, TagTechnology};
use nfctool_durability::{BackupError, BackupStore};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, NfcConfig};
use crate::coordinator::{TagWriteCoordinator, WriteReport, WriteState};
use crate::diagnostics::{unknown_tag_report, UnknownTagReport};
use crate::error::WriteFailure;
use crate::probe;

/// Reads, writes and inspects tags
pub struct TagManager {
    config: NfcConfig,
    store: Arc<dyn BackupStore>,
    coordinator: TagWriteCoordinator,
}

impl TagManager {
    /// Create a manager over an existing backup store
    pub fn new(config: NfcConfig, store: Arc<dyn BackupStore>) -> Self {
        let coordinator = TagWriteCoordinator::new(&config, Arc::clone(&store));
        Self {
            config,
            store,
            coordinator,
        }
    }

    /// Validate `config` and open the backup store it names
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the store cannot be
    /// opened.
    pub fn from_config(config: NfcConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = config.open_backup_store()?;
        Ok(Self::new(config, store))
    }

    /// Active configuration
    pub fn config(&self) -> &NfcConfig {
        &self.config
    }

    /// Backup store shared with the coordinator
    pub fn backup_store(&self) -> &Arc<dyn BackupStore> {
        &self.store
    }

    /// Write coordinator used by [`write_to_tag`](Self::write_to_tag)
    pub fn coordinator(&self) -> &TagWriteCoordinator {
        &self.coordinator
    }

    /// Text contents of the tag.
    ///
    /// The content read is saved as the backup. A tag that reports no
    /// content gets the backup written back and its texts are returned,
    /// which repairs tags blanked by an interrupted write. Failures are
    /// logged and yield an empty list. The session timeout is checked
    /// before the read and before the write-back.
    pub fn read_from_tag(&self, tag: &mut dyn TagHandle) -> Vec<String> {
        let session = match tag.session(TagTechnology::Ndef) {
            Some(session) => session,
            None => {
                debug!(target: "nfctool::read", "Tag does not support NDEF");
                return Vec::new();
            }
        };

        let texts = self.read_session(session, Instant::now());

        if session.is_connected() {
            if let Err(e) = session.close() {
                error!(target: "nfctool::read", error = %e, "Failed to close tag");
            }
        }
        texts
    }

    fn read_session(&self, session: &mut dyn TagSession, started: Instant) -> Vec<String> {
        if let Err(e) = session.connect() {
            error!(target: "nfctool::read", error = %e, "Failed to connect to tag");
            return Vec::new();
        }

        if self.deadline_expired(started, "read") {
            return Vec::new();
        }

        let cached = match session.read_cached_message() {
            Ok(cached) => cached,
            Err(e) => {
                error!(target: "nfctool::read", error = %e, "Failed to read tag");
                return Vec::new();
            }
        };

        match cached {
            Some(current) => {
                if let Err(e) = self.store.save(&self.config.backup_key, &current) {
                    warn!(target: "nfctool::backup", error = %e, "Failed to save backup");
                }
                message::text_contents(&current)
            }
            None => self.restore_blank_tag(session, started),
        }
    }

    fn restore_blank_tag(&self, session: &mut dyn TagSession, started: Instant) -> Vec<String> {
        let backup = match self.store.load(&self.config.backup_key) {
            Ok(Some(backup)) => backup,
            Ok(None) => {
                debug!(target: "nfctool::read", "Tag is blank and no backup exists");
                return Vec::new();
            }
            Err(e) => {
                warn!(target: "nfctool::backup", error = %e, "Failed to load backup");
                return Vec::new();
            }
        };

        if self.deadline_expired(started, "restore") {
            return Vec::new();
        }

        info!(target: "nfctool::read", records = backup.len(), "Tag is blank, writing backup back");
        if let Err(e) = session.write_message(&backup) {
            error!(target: "nfctool::read", error = %e, "Failed to restore backup to blank tag");
            return Vec::new();
        }
        message::text_contents(&backup)
    }

    fn deadline_expired(&self, started: Instant, step: &'static str) -> bool {
        let elapsed = started.elapsed();
        if elapsed < self.config.session_timeout() {
            return false;
        }
        warn!(
            target: "nfctool::read",
            step,
            elapsed_ms = elapsed.as_millis() as u64,
            "Session timed out, skipping tag access"
        );
        true
    }

    /// Whether the tag accepts writes; see [`probe`](crate::probe)
    pub fn is_tag_writable(&self, tag: &mut dyn TagHandle) -> bool {
        probe::is_writable(tag)
    }

    /// Replace `texts[index]` with `new_text` and write every text to the
    /// tag. See [`TagWriteCoordinator::write`].
    pub fn write_to_tag(
        &self,
        tag: &mut dyn TagHandle,
        texts: &[String],
        index: usize,
        new_text: &str,
    ) -> WriteReport {
        match tag.session(TagTechnology::Ndef) {
            Some(session) => self.coordinator.write(session, texts, index, new_text),
            None => {
                warn!(target: "nfctool::write", "Tag does not support NDEF");
                WriteReport {
                    outcome: Err(WriteFailure::Connect(SessionError::Unsupported(
                        "tag does not support NDEF".into(),
                    ))),
                    path: vec![WriteState::Idle],
                    restore: None,
                    close_error: None,
                }
            }
        }
    }

    /// Diagnostics for a tag without text content
    pub fn handle_unknown_tag(&self, tag: &dyn TagHandle) -> UnknownTagReport {
        unknown_tag_report(tag)
    }

    /// Stored backup, if any
    pub fn backup(&self) -> Result<Option<NdefMessage>, BackupError> {
        self.store.load(&self.config.backup_key)
    }

    /// Delete the backup slot
    ///
    /// Returns true if a backup existed.
    pub fn reset_backup(&self) -> Result<bool, BackupError> {
        let removed = self.store.remove(&self.config.backup_key)?;
        debug!(target: "nfctool::backup", removed, "Backup reset");
        Ok(removed)
    }
}
