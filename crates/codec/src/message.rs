//! Message codec
//!
//! Maps whole messages through the record codec and enforces the one
//! structural rule checked before anything is written to a tag: no record
//! may have TNF `empty`.

use nfctool_core::{NdefMessage, RawRecord, Tnf};
use tracing::warn;

use crate::error::{RecordError, ValidationError};
use crate::record::{decode_record, encode_text, parse_text, ParsedRecord, RTD_TEXT};

/// Decode records in document order, one [`ParsedRecord`] per record.
pub fn decode(records: &[RawRecord]) -> Vec<ParsedRecord> {
    records.iter().map(decode_record).collect()
}

/// Encode texts as well-known text records, preserving order.
///
/// # Errors
///
/// `InvalidLanguageCode` if `language_code` cannot be stored.
pub fn encode<S: AsRef<str>>(texts: &[S], language_code: &str) -> Result<NdefMessage, RecordError> {
    let records = texts
        .iter()
        .map(|t| encode_text(t.as_ref(), language_code))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NdefMessage::new(records))
}

/// Check message-level invariants.
///
/// # Errors
///
/// `EmptyRecord` naming the first record with TNF `empty`.
pub fn validate(message: &NdefMessage) -> Result<(), ValidationError> {
    match message.iter().position(|r| r.tnf == Tnf::Empty) {
        Some(index) => Err(ValidationError::EmptyRecord { index }),
        None => Ok(()),
    }
}

/// Boolean form of [`validate`]
pub fn is_valid(message: &NdefMessage) -> bool {
    validate(message).is_ok()
}

/// Contents of the well-known text records of a message.
///
/// Records of other types are skipped; malformed text records are skipped
/// with a warning.
pub fn text_contents(message: &NdefMessage) -> Vec<String> {
    message
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_well_known(RTD_TEXT))
        .filter_map(|(index, r)| match parse_text(r) {
            Ok(text) => Some(text.text),
            Err(e) => {
                warn!(target: "nfctool::codec", index, error = %e, "Skipping malformed text record");
                None
            }
        })
        .collect()
}
