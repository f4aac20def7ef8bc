//! NDEF codecs for nfctool
//!
//! Pure functions, reentrant and safe to call from any thread:
//!
//! - record: Decode one raw record into a [`ParsedRecord`]; encode text records
//! - uri / smart_poster: Format-specific sub-decoders used by the record codec
//! - message: Decode/encode whole messages and validate message invariants
//! - wire: NDEF binary message format (used to persist messages)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod message;
pub mod record;
pub mod smart_poster;
pub mod uri;
pub mod wire;

pub use error::{RecordError, ValidationError, WireError};
pub use record::{
    decode_record, decode_text, encode_text, parse_text, ParsedRecord, TextEncoding, TextRecord,
    DEFAULT_LANGUAGE_CODE, RTD_TEXT,
};
pub use smart_poster::{decode_smart_poster, encode_smart_poster, SmartPoster, RTD_SMART_POSTER};
pub use uri::{decode_uri, encode_uri, RTD_URI};
