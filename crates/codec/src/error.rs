//! Codec error types

use thiserror::Error;

/// Record-level decode/encode errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Record is not a well-known text record
    #[error("Record is not a text record")]
    NotText,

    /// Record is neither a well-known URI nor an absolute-URI record
    #[error("Record is not a URI record")]
    NotUri,

    /// Record is not a well-known smart poster record
    #[error("Record is not a smart poster record")]
    NotSmartPoster,

    /// Record has the right type but a broken payload
    #[error("Malformed record: {0}")]
    Malformed(String),

    /// Language code is not 7-bit ASCII or does not fit the 6-bit length field
    #[error("Invalid language code: {0:?}")]
    InvalidLanguageCode(String),
}

impl RecordError {
    /// Create a malformed-record error
    pub fn malformed(detail: impl Into<String>) -> Self {
        RecordError::Malformed(detail.into())
    }
}

/// Message-level structural violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A record with TNF `empty` is present
    #[error("Record {index} has type-name-format empty")]
    EmptyRecord {
        /// Position of the offending record
        index: usize,
    },
}

/// NDEF binary format errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Not enough data to parse a record
    #[error("Insufficient data to parse record at offset {offset}")]
    InsufficientData {
        /// Offset where more bytes were expected
        offset: usize,
    },

    /// First record does not carry the message-begin flag
    #[error("First record is missing the message-begin flag")]
    MissingMessageBegin,

    /// Message-begin flag on a record other than the first
    #[error("Unexpected message-begin flag on record {index}")]
    UnexpectedMessageBegin {
        /// Wire position of the offending record
        index: usize,
    },

    /// Input ended before a record carrying the message-end flag
    #[error("Message is missing the message-end flag")]
    MissingMessageEnd,

    /// Bytes follow the record carrying the message-end flag
    #[error("{0} trailing bytes after message end")]
    TrailingData(usize),

    /// TNF value 7 is reserved
    #[error("Reserved type-name-format on record {index}")]
    ReservedTnf {
        /// Wire position of the offending record
        index: usize,
    },

    /// Broken chunk sequence
    #[error("Invalid chunk on record {index}: {detail}")]
    InvalidChunk {
        /// Wire position of the offending record
        index: usize,
        /// What is wrong with the chunk
        detail: &'static str,
    },

    /// Record with TNF `empty` carries type, id or payload bytes
    #[error("Empty record {index} carries data")]
    InvalidEmptyRecord {
        /// Wire position of the offending record
        index: usize,
    },

    /// Field does not fit its length prefix
    #[error("Field {field} too long: {len} bytes")]
    FieldTooLong {
        /// Field name
        field: &'static str,
        /// Actual length
        len: usize,
    },
}
