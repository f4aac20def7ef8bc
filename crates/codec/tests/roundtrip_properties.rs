//! Codec properties
//!
//! - Text records decode to exactly the text they were built from
//! - Any message without empty records survives the binary format
//! - Empty records carrying data are refused at encode time
//! - Decoding never drops records, whatever their content

use nfctool_codec::{decode_text, encode_text, message, wire, ParsedRecord, WireError};
use nfctool_core::{NdefMessage, RawRecord, Tnf};
use proptest::prelude::*;

fn language_code() -> impl Strategy<Value = String> {
    "[a-zA-Z-]{0,63}"
}

fn non_empty_tnf() -> impl Strategy<Value = Tnf> {
    prop_oneof![
        Just(Tnf::WellKnown),
        Just(Tnf::Mime),
        Just(Tnf::AbsoluteUri),
        Just(Tnf::External),
        Just(Tnf::Unknown),
    ]
}

fn raw_record() -> impl Strategy<Value = RawRecord> {
    (
        non_empty_tnf(),
        prop::collection::vec(any::<u8>(), 0..16),
        prop::collection::vec(any::<u8>(), 0..8),
        prop::collection::vec(any::<u8>(), 0..400),
    )
        .prop_map(|(tnf, record_type, id, payload)| RawRecord::new(tnf, record_type, id, payload))
}

proptest! {
    #[test]
    fn text_roundtrip(text in any::<String>(), lc in language_code()) {
        let record = encode_text(&text, &lc).unwrap();
        prop_assert_eq!(decode_text(&record).unwrap(), text);
    }

    #[test]
    fn text_status_byte_is_language_length(text in ".*", lc in language_code()) {
        let record = encode_text(&text, &lc).unwrap();
        prop_assert_eq!(record.payload[0] as usize, lc.len());
        prop_assert_eq!(record.payload[0] & 0xC0, 0);
    }

    #[test]
    fn wire_roundtrip(records in prop::collection::vec(raw_record(), 0..6)) {
        let message = NdefMessage::new(records);
        let bytes = wire::encode_message(&message).unwrap();
        prop_assert_eq!(wire::decode_message(&bytes).unwrap(), message);
    }

    #[test]
    fn empty_record_with_payload_never_encodes(
        records in prop::collection::vec(raw_record(), 0..4),
        position in any::<prop::sample::Index>(),
        payload in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        let mut records = records;
        let index = position.index(records.len() + 1);
        records.insert(index, RawRecord::new(Tnf::Empty, Vec::new(), Vec::new(), payload));
        let message = NdefMessage::new(records);
        prop_assert_eq!(
            wire::encode_message(&message),
            Err(WireError::InvalidEmptyRecord { index })
        );
    }

    #[test]
    fn decode_yields_one_record_per_input(records in prop::collection::vec(raw_record(), 0..8)) {
        let parsed = message::decode(&records);
        prop_assert_eq!(parsed.len(), records.len());
    }

    #[test]
    fn encoded_messages_validate(texts in prop::collection::vec(".*", 0..5)) {
        let encoded = message::encode(&texts, "en").unwrap();
        prop_assert!(message::is_valid(&encoded));
        let contents: Vec<String> = message::decode(encoded.records())
            .into_iter()
            .map(ParsedRecord::into_content)
            .collect();
        prop_assert_eq!(contents, texts);
    }
}
