//! Record codec
//!
//! Decodes one raw record into a typed [`ParsedRecord`] and encodes text
//! into well-known text records.
//!
//! # Text Record Payload
//!
//! ```text
//! ┌─────────────┬──────────────────────┬──────────────────────────┐
//! │ Status (1)  │ Language code (L)    │ Text (UTF-8 or UTF-16)   │
//! └─────────────┴──────────────────────┴──────────────────────────┘
//!
//! Status byte:
//! ┌──────────┬──────────┬──────────────────────────┐
//! │ bit 7    │ bit 6    │ bits 5..0                │
//! │ encoding │ reserved │ language code length (L) │
//! └──────────┴──────────┴──────────────────────────┘
//! ```
//!
//! Bit 7 clear selects UTF-8, set selects UTF-16. Bit 6 is written as zero
//! and ignored on read.

use std::fmt;

use nfctool_core::limits::is_valid_language_code;
use nfctool_core::{RawRecord, Tnf};

use crate::error::RecordError;
use crate::smart_poster::decode_smart_poster;
use crate::uri::decode_uri;

/// Well-known type of text records
pub const RTD_TEXT: &[u8] = b"T";

/// Language code used when the caller does not pick one
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Status bit selecting UTF-16
const STATUS_UTF16: u8 = 0x80;

/// Status bits holding the language code length
const STATUS_LANGUAGE_LEN_MASK: u8 = 0x3F;

/// Typed view of a record
///
/// Derived on demand from a [`RawRecord`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    /// Well-known text record
    Text(String),
    /// Well-known URI or absolute-URI record
    Uri(String),
    /// Smart poster, rendered
    SmartPoster(String),
    /// Anything else: payload bytes rendered as text without interpretation
    Raw(String),
}

impl ParsedRecord {
    /// Rendered content of the record
    pub fn content(&self) -> &str {
        match self {
            ParsedRecord::Text(s)
            | ParsedRecord::Uri(s)
            | ParsedRecord::SmartPoster(s)
            | ParsedRecord::Raw(s) => s,
        }
    }

    /// Consume the record, returning its rendered content
    pub fn into_content(self) -> String {
        match self {
            ParsedRecord::Text(s)
            | ParsedRecord::Uri(s)
            | ParsedRecord::SmartPoster(s)
            | ParsedRecord::Raw(s) => s,
        }
    }

    /// True for text records
    pub fn is_text(&self) -> bool {
        matches!(self, ParsedRecord::Text(_))
    }
}

impl fmt::Display for ParsedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content())
    }
}

/// Character encoding of a text record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 (status bit 7 clear)
    Utf8,
    /// UTF-16 (status bit 7 set)
    Utf16,
}

/// Fully decoded text record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    /// Encoding selected by the status byte
    pub encoding: TextEncoding,
    /// IANA language code
    pub language: String,
    /// Text content
    pub text: String,
}

/// Decode a well-known text record with its language and encoding.
///
/// # Errors
///
/// `NotText` unless the record is well-known `T`. `Malformed` for an empty
/// payload, a language code length past the end of the payload, or a
/// UTF-16 body with an odd byte count.
pub fn parse_text(record: &RawRecord) -> Result<TextRecord, RecordError> {
    if !record.is_well_known(RTD_TEXT) {
        return Err(RecordError::NotText);
    }

    let (&status, rest) = record
        .payload
        .split_first()
        .ok_or_else(|| RecordError::malformed("empty text payload"))?;

    let language_len = (status & STATUS_LANGUAGE_LEN_MASK) as usize;
    if language_len > rest.len() {
        return Err(RecordError::malformed(format!(
            "language code length {} exceeds payload of {} bytes",
            language_len,
            record.payload.len()
        )));
    }
    let (language, body) = rest.split_at(language_len);

    let encoding = if status & STATUS_UTF16 == 0 {
        TextEncoding::Utf8
    } else {
        TextEncoding::Utf16
    };
    let text = match encoding {
        TextEncoding::Utf8 => String::from_utf8_lossy(body).into_owned(),
        TextEncoding::Utf16 => decode_utf16(body)?,
    };

    Ok(TextRecord {
        encoding,
        language: String::from_utf8_lossy(language).into_owned(),
        text,
    })
}

/// Decode the text content of a well-known text record.
pub fn decode_text(record: &RawRecord) -> Result<String, RecordError> {
    parse_text(record).map(|r| r.text)
}

/// Build a UTF-8 well-known text record.
///
/// # Errors
///
/// `InvalidLanguageCode` if `language_code` is not 7-bit ASCII or longer
/// than 63 bytes.
pub fn encode_text(text: &str, language_code: &str) -> Result<RawRecord, RecordError> {
    if !is_valid_language_code(language_code) {
        return Err(RecordError::InvalidLanguageCode(language_code.to_string()));
    }

    let language = language_code.as_bytes();
    let body = text.as_bytes();
    let mut payload = Vec::with_capacity(1 + language.len() + body.len());
    // Bit 7 clear (UTF-8), bit 6 clear (reserved)
    payload.push(language.len() as u8);
    payload.extend_from_slice(language);
    payload.extend_from_slice(body);

    Ok(RawRecord::new(
        Tnf::WellKnown,
        RTD_TEXT.to_vec(),
        Vec::new(),
        payload,
    ))
}

/// Decode any record, degrading to [`ParsedRecord::Raw`].
///
/// Tries URI, then text, then smart poster. Never fails.
pub fn decode_record(record: &RawRecord) -> ParsedRecord {
    if let Ok(uri) = decode_uri(record) {
        return ParsedRecord::Uri(uri);
    }
    if let Ok(text) = decode_text(record) {
        return ParsedRecord::Text(text);
    }
    if let Ok(poster) = decode_smart_poster(record) {
        return ParsedRecord::SmartPoster(poster.to_string());
    }
    ParsedRecord::Raw(String::from_utf8_lossy(&record.payload).into_owned())
}

/// Decode UTF-16, honouring a byte-order mark; big-endian by default.
fn decode_utf16(bytes: &[u8]) -> Result<String, RecordError> {
    if bytes.len() % 2 != 0 {
        return Err(RecordError::malformed(format!(
            "UTF-16 text has odd length {}",
            bytes.len()
        )));
    }

    let (big_endian, body) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        _ => (true, bytes),
    };

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}
