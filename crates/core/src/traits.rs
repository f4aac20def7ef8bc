//! Capability traits over physical tags
//!
//! These traits are the seam between the protocol logic and the radio
//! stack. Everything above this layer is testable without hardware.

use crate::error::{SessionError, SessionResult};
use crate::types::{MifareClassicInfo, MifareUltralightInfo, NdefMessage, TagTechnology};

/// A connection to one technology of a physical tag
///
/// All operations are blocking I/O.
///
/// # Contract
///
/// `close` must be safe to call multiple times and after a failed
/// `connect`.
pub trait TagSession {
    /// Open the connection
    fn connect(&mut self) -> SessionResult<()>;

    /// True while the connection is open
    fn is_connected(&self) -> bool;

    /// Message read by the platform at discovery time, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot report the message.
    fn read_cached_message(&mut self) -> SessionResult<Option<NdefMessage>>;

    /// Overwrite the tag's content with `message`
    fn write_message(&mut self, message: &NdefMessage) -> SessionResult<()>;

    /// Release the connection
    fn close(&mut self) -> SessionResult<()>;

    /// Writability flag reported by the tag itself
    fn is_writable(&self) -> bool;
}

/// A discovered tag
///
/// Exposes the tag identity, its technology list and one session per
/// supported technology.
pub trait TagHandle {
    /// Raw tag identifier
    fn id(&self) -> &[u8];

    /// Technology names exactly as reported by the hardware
    fn tech_list(&self) -> &[String];

    /// Session for a technology, if the tag supports it
    fn session(&mut self, tech: TagTechnology) -> Option<&mut dyn TagSession>;

    /// MIFARE Classic metadata
    ///
    /// None if the tag is not a MIFARE Classic tag. Reading the metadata
    /// may fail on a flaky link.
    fn mifare_classic_info(&self) -> Option<Result<MifareClassicInfo, SessionError>> {
        None
    }

    /// MIFARE Ultralight metadata, None if not an Ultralight tag
    fn mifare_ultralight_info(&self) -> Option<MifareUltralightInfo> {
        None
    }

    /// Classified technology list, in reported order
    fn technologies(&self) -> Vec<TagTechnology> {
        TagTechnology::from_names(self.tech_list())
    }
}
