//! Smart poster records
//!
//! A smart poster (well-known `Sp`) nests a complete NDEF message in its
//! payload: exactly one URI record plus optional text records used as
//! titles. Other nested records (actions, icons, sizes) are ignored.

use std::fmt;

use nfctool_core::{NdefMessage, RawRecord, Tnf};

use crate::error::RecordError;
use crate::record::{decode_text, encode_text};
use crate::uri::{decode_uri, encode_uri};
use crate::wire;

/// Well-known type of smart poster records
pub const RTD_SMART_POSTER: &[u8] = b"Sp";

/// Decoded smart poster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartPoster {
    /// Target URI
    pub uri: String,
    /// First title, if any
    pub title: Option<String>,
}

impl fmt::Display for SmartPoster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", title, self.uri),
            None => f.write_str(&self.uri),
        }
    }
}

/// Decode a smart poster record.
///
/// # Errors
///
/// `NotSmartPoster` unless the record is well-known `Sp`. `Malformed` if
/// the nested message cannot be parsed or does not hold exactly one URI.
pub fn decode_smart_poster(record: &RawRecord) -> Result<SmartPoster, RecordError> {
    if !record.is_well_known(RTD_SMART_POSTER) {
        return Err(RecordError::NotSmartPoster);
    }

    let nested = wire::decode_message(&record.payload)
        .map_err(|e| RecordError::malformed(format!("smart poster body: {}", e)))?;

    let mut uris = nested.iter().filter_map(|r| decode_uri(r).ok());
    let uri = uris
        .next()
        .ok_or_else(|| RecordError::malformed("smart poster has no URI record"))?;
    if uris.next().is_some() {
        return Err(RecordError::malformed("smart poster has several URI records"));
    }

    let title = nested.iter().find_map(|r| decode_text(r).ok());

    Ok(SmartPoster { uri, title })
}

/// Build a smart poster record from a URI and an optional title.
///
/// # Errors
///
/// Propagates `InvalidLanguageCode` from the title record.
pub fn encode_smart_poster(
    uri: &str,
    title: Option<&str>,
    language_code: &str,
) -> Result<RawRecord, RecordError> {
    let mut records = vec![encode_uri(uri)];
    if let Some(title) = title {
        records.push(encode_text(title, language_code)?);
    }
    let payload = wire::encode_message(&NdefMessage::new(records))
        .map_err(|e| RecordError::malformed(e.to_string()))?;

    Ok(RawRecord::new(
        Tnf::WellKnown,
        RTD_SMART_POSTER.to_vec(),
        Vec::new(),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{decode_record, ParsedRecord};

    #[test]
    fn test_smart_poster_with_title() {
        let record = encode_smart_poster("https://example.com", Some("Front door"), "en").unwrap();
        let poster = decode_smart_poster(&record).unwrap();

        assert_eq!(poster.uri, "https://example.com");
        assert_eq!(poster.title.as_deref(), Some("Front door"));
        assert_eq!(poster.to_string(), "Front door (https://example.com)");
    }

    #[test]
    fn test_smart_poster_without_title() {
        let record = encode_smart_poster("tel:+886212345678", None, "en").unwrap();
        let poster = decode_smart_poster(&record).unwrap();

        assert_eq!(poster.title, None);
        assert_eq!(poster.to_string(), "tel:+886212345678");
    }

    #[test]
    fn test_smart_poster_without_uri_is_malformed() {
        let body = wire::encode_message(&NdefMessage::new(vec![
            encode_text("title only", "en").unwrap()
        ]))
        .unwrap();
        let record = RawRecord::new(Tnf::WellKnown, b"Sp".to_vec(), vec![], body);

        assert!(matches!(
            decode_smart_poster(&record),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn test_smart_poster_with_two_uris_is_malformed() {
        let body = wire::encode_message(&NdefMessage::new(vec![
            encode_uri("https://a.example"),
            encode_uri("https://b.example"),
        ]))
        .unwrap();
        let record = RawRecord::new(Tnf::WellKnown, b"Sp".to_vec(), vec![], body);

        assert!(matches!(
            decode_smart_poster(&record),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn test_smart_poster_with_garbage_body_falls_back_to_raw() {
        let record = RawRecord::new(Tnf::WellKnown, b"Sp".to_vec(), vec![], b"zz".to_vec());

        assert!(matches!(
            decode_smart_poster(&record),
            Err(RecordError::Malformed(_))
        ));
        assert_eq!(decode_record(&record), ParsedRecord::Raw("zz".into()));
    }

    #[test]
    fn test_decode_record_smart_poster() {
        let record = encode_smart_poster("https://example.com", Some("Lobby"), "en").unwrap();
        assert_eq!(
            decode_record(&record),
            ParsedRecord::SmartPoster("Lobby (https://example.com)".into())
        );
    }

    #[test]
    fn test_not_smart_poster() {
        let record = encode_uri("https://example.com");
        assert_eq!(
            decode_smart_poster(&record),
            Err(RecordError::NotSmartPoster)
        );
    }
}
