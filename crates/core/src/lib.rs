//! Core types and traits for nfctool
//!
//! This crate defines the foundational types used throughout the system:
//! - Tnf, RawRecord, NdefMessage: The NDEF data model
//! - TagTechnology: Technology classes that drive writability probing
//! - SessionError: Failures of the hardware channel
//! - Traits: Capability interfaces over physical tags (TagSession, TagHandle)
//! - Limits: Format limits of NDEF text records

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod traits;
pub mod types;

pub use error::{SessionError, SessionResult};
pub use limits::{is_valid_language_code, MAX_LANGUAGE_CODE_LEN};
pub use traits::{TagHandle, TagSession};
pub use types::{
    short_tech_name, MifareClassicInfo, MifareClassicKind, MifareUltralightInfo,
    MifareUltralightKind, NdefMessage, RawRecord, TagTechnology, Tnf, TECH_PREFIX,
};
