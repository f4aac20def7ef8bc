//! Core NDEF and tag types
//!
//! This module defines the foundational types:
//! - Tnf: Type-name-format discriminator carried by every record
//! - RawRecord: One undecoded NDEF record as delivered by the hardware layer
//! - NdefMessage: Ordered sequence of records (index is an addressable slot)
//! - TagTechnology: Technology classes a tag may expose
//! - MifareClassicInfo / MifareUltralightInfo: Technology-specific metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix the platform puts in front of technology class names.
pub const TECH_PREFIX: &str = "android.nfc.tech.";

/// Type-name-format of an NDEF record
///
/// Describes how the record's type field must be interpreted. The wire
/// values 6 (unchanged) and 7 (reserved) never appear on a decoded record;
/// they are handled by the binary format layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tnf {
    /// Record carries no type, id or payload
    Empty = 0x00,
    /// NFC Forum well-known type (RTD), e.g. `T`, `U`, `Sp`
    WellKnown = 0x01,
    /// Media type as defined in RFC 2046
    Mime = 0x02,
    /// Absolute URI as defined in RFC 3986
    AbsoluteUri = 0x03,
    /// NFC Forum external type
    External = 0x04,
    /// Payload type is unknown
    Unknown = 0x05,
}

impl Tnf {
    /// Convert from the 3-bit wire value.
    ///
    /// Returns None for `unchanged` (6), `reserved` (7) and anything wider.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Tnf::Empty),
            0x01 => Some(Tnf::WellKnown),
            0x02 => Some(Tnf::Mime),
            0x03 => Some(Tnf::AbsoluteUri),
            0x04 => Some(Tnf::External),
            0x05 => Some(Tnf::Unknown),
            _ => None,
        }
    }

    /// Wire value of this TNF
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Tnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tnf::Empty => "empty",
            Tnf::WellKnown => "well-known",
            Tnf::Mime => "mime",
            Tnf::AbsoluteUri => "absolute-uri",
            Tnf::External => "external",
            Tnf::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One raw NDEF record
///
/// Transient: produced by the hardware layer on every read and never
/// interpreted here. Decoding lives in the codec crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRecord {
    /// Type-name-format
    pub tnf: Tnf,
    /// Type field (e.g. `b"T"` for a well-known text record)
    pub record_type: Vec<u8>,
    /// Record identifier, usually empty
    pub id: Vec<u8>,
    /// Payload bytes
    pub payload: Vec<u8>,
}

impl RawRecord {
    /// Create a new record
    pub fn new(tnf: Tnf, record_type: Vec<u8>, id: Vec<u8>, payload: Vec<u8>) -> Self {
        RawRecord {
            tnf,
            record_type,
            id,
            payload,
        }
    }

    /// Create a record with TNF `empty` and no fields
    pub fn empty() -> Self {
        RawRecord::new(Tnf::Empty, Vec::new(), Vec::new(), Vec::new())
    }

    /// True if this record is a well-known record of the given type
    pub fn is_well_known(&self, record_type: &[u8]) -> bool {
        self.tnf == Tnf::WellKnown && self.record_type == record_type
    }
}

/// Ordered sequence of NDEF records
///
/// Order is semantically significant: callers address records by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NdefMessage {
    records: Vec<RawRecord>,
}

impl NdefMessage {
    /// Create a message from records, preserving order
    pub fn new(records: Vec<RawRecord>) -> Self {
        NdefMessage { records }
    }

    /// Records in document order
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the message has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the message, returning its records
    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }

    /// Iterate records in document order
    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }
}

impl From<Vec<RawRecord>> for NdefMessage {
    fn from(records: Vec<RawRecord>) -> Self {
        NdefMessage::new(records)
    }
}

impl<'a> IntoIterator for &'a NdefMessage {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Technology class exposed by a discovered tag
///
/// Derived from the hardware's reported technology names. Only the classes
/// that drive writability probing are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagTechnology {
    /// Generic NDEF access
    Ndef,
    /// MIFARE Classic
    MifareClassic,
    /// MIFARE Ultralight
    MifareUltralight,
    /// Anything else (NfcA, IsoDep, ...)
    Other,
}

impl TagTechnology {
    /// Classify a reported technology name.
    ///
    /// Accepts both fully qualified (`android.nfc.tech.Ndef`) and bare
    /// (`Ndef`) names.
    pub fn from_name(name: &str) -> Self {
        match short_tech_name(name) {
            "Ndef" => TagTechnology::Ndef,
            "MifareClassic" => TagTechnology::MifareClassic,
            "MifareUltralight" => TagTechnology::MifareUltralight,
            _ => TagTechnology::Other,
        }
    }

    /// Classify every name in a technology list, preserving order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names.iter().map(|n| Self::from_name(n.as_ref())).collect()
    }
}

/// Strip the platform package prefix from a technology name, if present.
pub fn short_tech_name(name: &str) -> &str {
    name.strip_prefix(TECH_PREFIX).unwrap_or(name)
}

/// MIFARE Classic variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MifareClassicKind {
    /// MIFARE Classic
    Classic,
    /// MIFARE Plus
    Plus,
    /// MIFARE Pro
    Pro,
    /// Unrecognised variant
    Unknown,
}

impl fmt::Display for MifareClassicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MifareClassicKind::Classic => "Classic",
            MifareClassicKind::Plus => "Plus",
            MifareClassicKind::Pro => "Pro",
            MifareClassicKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Metadata reported by a MIFARE Classic tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MifareClassicInfo {
    /// Variant
    pub kind: MifareClassicKind,
    /// Total memory size in bytes
    pub size: usize,
    /// Number of sectors
    pub sector_count: usize,
    /// Number of blocks
    pub block_count: usize,
}

/// MIFARE Ultralight variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MifareUltralightKind {
    /// MIFARE Ultralight
    Ultralight,
    /// MIFARE Ultralight C
    UltralightC,
    /// Unrecognised variant
    Unknown,
}

impl fmt::Display for MifareUltralightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MifareUltralightKind::Ultralight => "Ultralight",
            MifareUltralightKind::UltralightC => "Ultralight C",
            MifareUltralightKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Metadata reported by a MIFARE Ultralight tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MifareUltralightInfo {
    /// Variant
    pub kind: MifareUltralightKind,
}
