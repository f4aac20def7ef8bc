//! Tag discovery dispatch
//!
//! Routes a discovery event to the right manager operation: a pending
//! edit is written, anything else is read, and a tag without text gets a
//! diagnostics report.

use nfctool_codec::{message, ParsedRecord};
use nfctool_core::{NdefMessage, TagHandle};
use tracing::debug;

use crate::coordinator::WriteReport;
use crate::diagnostics::UnknownTagReport;
use crate::manager::TagManager;

/// Kind of discovery event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryAction {
    /// Tag with NDEF content
    NdefDiscovered,
    /// Tag matched by technology
    TechDiscovered,
    /// Any other tag
    TagDiscovered,
    /// Not a tag event
    Other,
}

impl DiscoveryAction {
    /// Classify a platform action name
    pub fn from_action(action: &str) -> Self {
        match action {
            "android.nfc.action.NDEF_DISCOVERED" => DiscoveryAction::NdefDiscovered,
            "android.nfc.action.TECH_DISCOVERED" => DiscoveryAction::TechDiscovered,
            "android.nfc.action.TAG_DISCOVERED" => DiscoveryAction::TagDiscovered,
            _ => DiscoveryAction::Other,
        }
    }

    /// True for the three tag actions
    pub fn is_valid(self) -> bool {
        !matches!(self, DiscoveryAction::Other)
    }
}

/// A discovery event
pub struct TagDiscovery<'a> {
    /// Event kind
    pub action: DiscoveryAction,
    /// The discovered tag
    pub tag: &'a mut dyn TagHandle,
    /// Messages delivered with the event
    pub messages: Vec<NdefMessage>,
}

/// Edit waiting for the next tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// Text record to replace
    pub index: usize,
    /// Replacement text
    pub new_text: String,
}

/// What dispatching an event did
#[derive(Debug)]
pub enum DiscoveryOutcome {
    /// The pending edit was attempted
    Written {
        /// Probe result
        writable: bool,
        /// Write verdict and path
        report: WriteReport,
    },
    /// Text records were read
    Read {
        /// Probe result
        writable: bool,
        /// Text contents
        texts: Vec<String>,
        /// Messages delivered with the event
        messages: Vec<NdefMessage>,
    },
    /// No text records; diagnostics instead
    Unknown {
        /// Probe result
        writable: bool,
        /// Diagnostics
        report: UnknownTagReport,
    },
    /// Not a tag event
    Ignored {
        /// Probe result
        writable: bool,
    },
}

impl DiscoveryOutcome {
    /// Writability probed for the tag
    pub fn writable(&self) -> bool {
        match self {
            DiscoveryOutcome::Written { writable, .. }
            | DiscoveryOutcome::Read { writable, .. }
            | DiscoveryOutcome::Unknown { writable, .. }
            | DiscoveryOutcome::Ignored { writable } => *writable,
        }
    }
}

/// Text contents of the text records in `messages`, in order
pub fn event_texts(messages: &[NdefMessage]) -> Vec<String> {
    messages
        .iter()
        .flat_map(|m| message::decode(m.records()))
        .filter(ParsedRecord::is_text)
        .map(ParsedRecord::into_content)
        .collect()
}

impl TagManager {
    /// Handle a discovery event
    ///
    /// Writability is probed first so every outcome can report it.
    pub fn dispatch(
        &self,
        discovery: TagDiscovery<'_>,
        pending: Option<&PendingWrite>,
    ) -> DiscoveryOutcome {
        let TagDiscovery {
            action,
            tag,
            messages,
        } = discovery;

        let writable = self.is_tag_writable(tag);

        if !action.is_valid() {
            debug!(target: "nfctool::read", ?action, "Ignoring event");
            return DiscoveryOutcome::Ignored { writable };
        }

        if let Some(pending) = pending {
            let texts = event_texts(&messages);
            let report = self.write_to_tag(tag, &texts, pending.index, &pending.new_text);
            return DiscoveryOutcome::Written { writable, report };
        }

        let texts = self.read_from_tag(tag);
        if texts.is_empty() {
            let report = self.handle_unknown_tag(tag);
            DiscoveryOutcome::Unknown { writable, report }
        } else {
            DiscoveryOutcome::Read {
                writable,
                texts,
                messages,
            }
        }
    }
}
