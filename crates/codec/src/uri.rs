//! URI records
//!
//! Well-known `U` records abbreviate the URI scheme with a one-byte
//! identifier code from the NFC Forum URI RTD; absolute-URI records carry
//! the URI in the type field.

use nfctool_core::{RawRecord, Tnf};

use crate::error::RecordError;

/// Well-known type of URI records
pub const RTD_URI: &[u8] = b"U";

/// URI identifier codes, indexed by the code byte
pub const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Decode the URI carried by a record.
///
/// # Errors
///
/// `NotUri` for other record types, `Malformed` for an empty payload or an
/// identifier code outside the table.
pub fn decode_uri(record: &RawRecord) -> Result<String, RecordError> {
    match record.tnf {
        Tnf::AbsoluteUri => Ok(String::from_utf8_lossy(&record.record_type).into_owned()),
        Tnf::WellKnown if record.record_type == RTD_URI => {
            let (&code, rest) = record
                .payload
                .split_first()
                .ok_or_else(|| RecordError::malformed("empty URI payload"))?;
            let prefix = URI_PREFIXES
                .get(code as usize)
                .ok_or_else(|| RecordError::malformed(format!("unknown URI prefix code {:#04x}", code)))?;
            let mut uri = String::with_capacity(prefix.len() + rest.len());
            uri.push_str(prefix);
            uri.push_str(&String::from_utf8_lossy(rest));
            Ok(uri)
        }
        _ => Err(RecordError::NotUri),
    }
}

/// Build a well-known URI record, abbreviating the longest matching prefix.
pub fn encode_uri(uri: &str) -> RawRecord {
    let (code, prefix) = URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, p)| uri.starts_with(*p))
        .max_by_key(|(_, p)| p.len())
        .map(|(i, p)| (i as u8, *p))
        .unwrap_or((0, ""));

    let rest = &uri.as_bytes()[prefix.len()..];
    let mut payload = Vec::with_capacity(1 + rest.len());
    payload.push(code);
    payload.extend_from_slice(rest);
    RawRecord::new(Tnf::WellKnown, RTD_URI.to_vec(), Vec::new(), payload)
}
