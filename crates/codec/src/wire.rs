//! NDEF binary message format.
//!
//! This is the NFC Forum layout tags store and the form messages are
//! persisted in by the backup store.
//!
//! # Record Layout
//!
//! ```text
//! ┌────────────┬─────────────┬──────────────────┬───────────────┬──────┬────┬─────────┐
//! │ Header (1) │ Type Len (1)│ Payload Len (1|4)│ Id Len (0|1)  │ Type │ Id │ Payload │
//! └────────────┴─────────────┴──────────────────┴───────────────┴──────┴────┴─────────┘
//!
//! Header:
//! ┌────┬────┬────┬────┬────┬───────────┐
//! │ MB │ ME │ CF │ SR │ IL │ TNF (3)   │
//! └────┴────┴────┴────┴────┴───────────┘
//! ```
//!
//! Payload length is one byte when SR is set, otherwise a big-endian u32.
//! The id length byte is present only when IL is set. A record with CF set
//! is followed by continuation chunks (TNF `unchanged`, no type) whose
//! payloads are concatenated; the last chunk clears CF.

use nfctool_core::limits::{MAX_ID_LEN, MAX_SHORT_RECORD_PAYLOAD, MAX_TYPE_LEN};
use nfctool_core::{NdefMessage, RawRecord, Tnf};

use crate::error::WireError;

/// Message begin
pub const FLAG_MB: u8 = 0x80;
/// Message end
pub const FLAG_ME: u8 = 0x40;
/// Chunk flag
pub const FLAG_CF: u8 = 0x20;
/// Short record (1-byte payload length)
pub const FLAG_SR: u8 = 0x10;
/// Id length present
pub const FLAG_IL: u8 = 0x08;
/// Mask of the TNF bits in the header
pub const TNF_MASK: u8 = 0x07;
/// TNF of continuation chunks
pub const TNF_UNCHANGED: u8 = 0x06;
/// Reserved TNF
pub const TNF_RESERVED: u8 = 0x07;

/// Serialize a message to NDEF binary form.
///
/// An empty message serializes to zero bytes.
///
/// # Errors
///
/// Returns `FieldTooLong` if a type or id exceeds 255 bytes, or a payload
/// exceeds `u32::MAX` bytes. Returns `InvalidEmptyRecord` for a TNF `empty`
/// record carrying a type, id or payload, which [`decode_message`] rejects.
pub fn encode_message(message: &NdefMessage) -> Result<Vec<u8>, WireError> {
    let capacity = message
        .iter()
        .map(|r| 7 + r.record_type.len() + r.id.len() + r.payload.len())
        .sum();
    let mut out = Vec::with_capacity(capacity);

    let last = message.len().saturating_sub(1);
    for (index, record) in message.iter().enumerate() {
        encode_record(record, index, index == last, &mut out)?;
    }
    Ok(out)
}

/// Serialize the record at position `index`, appending to `out`.
pub fn encode_record(
    record: &RawRecord,
    index: usize,
    last: bool,
    out: &mut Vec<u8>,
) -> Result<(), WireError> {
    if record.tnf == Tnf::Empty
        && !(record.record_type.is_empty() && record.id.is_empty() && record.payload.is_empty())
    {
        return Err(WireError::InvalidEmptyRecord { index });
    }
    if record.record_type.len() > MAX_TYPE_LEN {
        return Err(WireError::FieldTooLong {
            field: "type",
            len: record.record_type.len(),
        });
    }
    if record.id.len() > MAX_ID_LEN {
        return Err(WireError::FieldTooLong {
            field: "id",
            len: record.id.len(),
        });
    }
    let payload_len = u32::try_from(record.payload.len()).map_err(|_| WireError::FieldTooLong {
        field: "payload",
        len: record.payload.len(),
    })?;

    let short = record.payload.len() <= MAX_SHORT_RECORD_PAYLOAD;
    let has_id = !record.id.is_empty();

    let mut header = record.tnf.as_u8();
    if index == 0 {
        header |= FLAG_MB;
    }
    if last {
        header |= FLAG_ME;
    }
    if short {
        header |= FLAG_SR;
    }
    if has_id {
        header |= FLAG_IL;
    }

    out.push(header);
    out.push(record.record_type.len() as u8);
    if short {
        out.push(payload_len as u8);
    } else {
        out.extend_from_slice(&payload_len.to_be_bytes());
    }
    if has_id {
        out.push(record.id.len() as u8);
    }
    out.extend_from_slice(&record.record_type);
    out.extend_from_slice(&record.id);
    out.extend_from_slice(&record.payload);
    Ok(())
}

/// Record being reassembled from chunks
struct PendingChunk {
    tnf: Tnf,
    record_type: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
}

/// Parse an NDEF binary message.
///
/// Zero bytes parse to an empty message.
pub fn decode_message(bytes: &[u8]) -> Result<NdefMessage, WireError> {
    let mut records = Vec::new();
    if bytes.is_empty() {
        return Ok(NdefMessage::new(records));
    }

    let mut offset = 0usize;
    let mut index = 0usize;
    let mut chunk: Option<PendingChunk> = None;

    loop {
        let header = take(bytes, &mut offset, 1)?[0];
        let tnf_bits = header & TNF_MASK;

        if index == 0 && header & FLAG_MB == 0 {
            return Err(WireError::MissingMessageBegin);
        }
        if index > 0 && header & FLAG_MB != 0 {
            return Err(WireError::UnexpectedMessageBegin { index });
        }

        let type_len = take(bytes, &mut offset, 1)?[0] as usize;
        let payload_len = if header & FLAG_SR != 0 {
            take(bytes, &mut offset, 1)?[0] as usize
        } else {
            let raw = take(bytes, &mut offset, 4)?;
            u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize
        };
        let id_len = if header & FLAG_IL != 0 {
            take(bytes, &mut offset, 1)?[0] as usize
        } else {
            0
        };

        let record_type = take(bytes, &mut offset, type_len)?.to_vec();
        let id = take(bytes, &mut offset, id_len)?.to_vec();
        let payload = take(bytes, &mut offset, payload_len)?;

        match chunk.take() {
            Some(mut pending) => {
                if tnf_bits != TNF_UNCHANGED {
                    return Err(WireError::InvalidChunk {
                        index,
                        detail: "continuation chunk must use TNF unchanged",
                    });
                }
                if type_len != 0 || id_len != 0 {
                    return Err(WireError::InvalidChunk {
                        index,
                        detail: "continuation chunk carries type or id",
                    });
                }
                pending.payload.extend_from_slice(payload);
                if header & FLAG_CF != 0 {
                    chunk = Some(pending);
                } else {
                    records.push(RawRecord::new(
                        pending.tnf,
                        pending.record_type,
                        pending.id,
                        pending.payload,
                    ));
                }
            }
            None => {
                if tnf_bits == TNF_UNCHANGED {
                    return Err(WireError::InvalidChunk {
                        index,
                        detail: "TNF unchanged outside a chunk sequence",
                    });
                }
                let tnf = Tnf::from_u8(tnf_bits).ok_or(WireError::ReservedTnf { index })?;
                if tnf == Tnf::Empty && (type_len != 0 || id_len != 0 || payload_len != 0) {
                    return Err(WireError::InvalidEmptyRecord { index });
                }
                if header & FLAG_CF != 0 {
                    chunk = Some(PendingChunk {
                        tnf,
                        record_type,
                        id,
                        payload: payload.to_vec(),
                    });
                } else {
                    records.push(RawRecord::new(tnf, record_type, id, payload.to_vec()));
                }
            }
        }

        index += 1;

        if header & FLAG_ME != 0 {
            if chunk.is_some() {
                return Err(WireError::InvalidChunk {
                    index: index - 1,
                    detail: "message ends inside a chunk sequence",
                });
            }
            if offset < bytes.len() {
                return Err(WireError::TrailingData(bytes.len() - offset));
            }
            return Ok(NdefMessage::new(records));
        }
        if offset >= bytes.len() {
            return Err(WireError::MissingMessageEnd);
        }
    }
}

/// Take `len` bytes starting at `offset`, advancing it.
fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8], WireError> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or(WireError::InsufficientData { offset: *offset })?;
    let slice = &bytes[*offset..end];
    *offset = end;
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_record(payload: &[u8]) -> RawRecord {
        RawRecord::new(Tnf::WellKnown, b"T".to_vec(), Vec::new(), payload.to_vec())
    }

    #[test]
    fn test_single_short_record_layout() {
        let message = NdefMessage::new(vec![text_record(&[0x02, b'e', b'n', b'h', b'i'])]);
        let bytes = encode_message(&message).unwrap();

        assert_eq!(
            bytes,
            vec![0xD1, 0x01, 0x05, b'T', 0x02, b'e', b'n', b'h', b'i']
        );
        assert_eq!(decode_message(&bytes).unwrap(), message);
    }

    #[test]
    fn test_long_record_uses_four_byte_length() {
        let payload = vec![0xAB; 300];
        let message = NdefMessage::new(vec![RawRecord::new(
            Tnf::Mime,
            b"application/octet-stream".to_vec(),
            Vec::new(),
            payload,
        )]);
        let bytes = encode_message(&message).unwrap();

        assert_eq!(bytes[0] & FLAG_SR, 0);
        assert_eq!(&bytes[2..6], &300u32.to_be_bytes());
        assert_eq!(decode_message(&bytes).unwrap(), message);
    }

    #[test]
    fn test_id_sets_il_flag() {
        let message = NdefMessage::new(vec![RawRecord::new(
            Tnf::Unknown,
            Vec::new(),
            vec![0x04, 0xA1, 0x3F],
            b"dump".to_vec(),
        )]);
        let bytes = encode_message(&message).unwrap();

        assert_ne!(bytes[0] & FLAG_IL, 0);
        assert_eq!(bytes[3], 3);
        assert_eq!(decode_message(&bytes).unwrap(), message);
    }

    #[test]
    fn test_flags_on_multiple_records() {
        let message = NdefMessage::new(vec![
            text_record(&[0x00, b'a']),
            text_record(&[0x00, b'b']),
            text_record(&[0x00, b'c']),
        ]);
        let bytes = encode_message(&message).unwrap();

        // Each record is 6 bytes: header, type len, payload len, type, 2 payload
        let headers: Vec<u8> = bytes.chunks(6).map(|c| c[0]).collect();
        assert_eq!(headers[0] & (FLAG_MB | FLAG_ME), FLAG_MB);
        assert_eq!(headers[1] & (FLAG_MB | FLAG_ME), 0);
        assert_eq!(headers[2] & (FLAG_MB | FLAG_ME), FLAG_ME);
        assert_eq!(decode_message(&bytes).unwrap(), message);
    }

    #[test]
    fn test_empty_message_is_zero_bytes() {
        let message = NdefMessage::default();
        assert!(encode_message(&message).unwrap().is_empty());
        assert!(decode_message(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_chunked_record_reassembled() {
        let bytes = vec![
            0xB1, 0x01, 0x02, b'T', 0x00, b'a', // MB CF SR, well-known T
            0x36, 0x00, 0x01, b'b', // CF SR, unchanged
            0x56, 0x00, 0x01, b'c', // ME SR, unchanged
        ];
        let message = decode_message(&bytes).unwrap();

        assert_eq!(message.len(), 1);
        assert_eq!(message.records()[0].record_type, b"T".to_vec());
        assert_eq!(message.records()[0].payload, vec![0x00, b'a', b'b', b'c']);
    }

    #[test]
    fn test_continuation_with_type_rejected() {
        let bytes = vec![
            0xB1, 0x01, 0x01, b'T', 0x00, //
            0x56, 0x01, 0x01, b'T', b'x',
        ];
        assert!(matches!(
            decode_message(&bytes),
            Err(WireError::InvalidChunk { index: 1, .. })
        ));
    }

    #[test]
    fn test_unchanged_outside_chunk_rejected() {
        let bytes = vec![0xD6, 0x00, 0x00];
        assert!(matches!(
            decode_message(&bytes),
            Err(WireError::InvalidChunk { index: 0, .. })
        ));
    }

    #[test]
    fn test_message_ending_inside_chunk_rejected() {
        let bytes = vec![0xF1, 0x01, 0x01, b'T', 0x00];
        assert!(matches!(
            decode_message(&bytes),
            Err(WireError::InvalidChunk { .. })
        ));
    }

    #[test]
    fn test_missing_message_begin() {
        let bytes = vec![0x51, 0x01, 0x00, b'T'];
        assert_eq!(decode_message(&bytes), Err(WireError::MissingMessageBegin));
    }

    #[test]
    fn test_unexpected_message_begin() {
        let bytes = vec![0x91, 0x01, 0x00, b'T', 0xD1, 0x01, 0x00, b'T'];
        assert_eq!(
            decode_message(&bytes),
            Err(WireError::UnexpectedMessageBegin { index: 1 })
        );
    }

    #[test]
    fn test_missing_message_end() {
        let bytes = vec![0x91, 0x01, 0x00, b'T'];
        assert_eq!(decode_message(&bytes), Err(WireError::MissingMessageEnd));
    }

    #[test]
    fn test_trailing_data() {
        let bytes = vec![0xD1, 0x01, 0x00, b'T', 0xFF, 0xFF];
        assert_eq!(decode_message(&bytes), Err(WireError::TrailingData(2)));
    }

    #[test]
    fn test_reserved_tnf() {
        let bytes = vec![0xD7, 0x00, 0x00];
        assert_eq!(
            decode_message(&bytes),
            Err(WireError::ReservedTnf { index: 0 })
        );
    }

    #[test]
    fn test_empty_record_with_payload_rejected() {
        let bytes = vec![0xD0, 0x00, 0x01, 0xAA];
        assert_eq!(
            decode_message(&bytes),
            Err(WireError::InvalidEmptyRecord { index: 0 })
        );
    }

    #[test]
    fn test_encode_rejects_empty_record_with_data() {
        let message = NdefMessage::new(vec![
            text_record(&[0x00, b'a']),
            RawRecord::new(Tnf::Empty, Vec::new(), Vec::new(), vec![0xAA]),
        ]);
        assert_eq!(
            encode_message(&message),
            Err(WireError::InvalidEmptyRecord { index: 1 })
        );

        let with_id = NdefMessage::new(vec![RawRecord::new(Tnf::Empty, vec![], vec![0x01], vec![])]);
        assert_eq!(
            encode_message(&with_id),
            Err(WireError::InvalidEmptyRecord { index: 0 })
        );
    }

    #[test]
    fn test_bare_empty_record_roundtrips() {
        let message = NdefMessage::new(vec![RawRecord::empty()]);
        let bytes = encode_message(&message).unwrap();
        assert_eq!(bytes, vec![0xD0, 0x00, 0x00]);
        assert_eq!(decode_message(&bytes).unwrap(), message);
    }

    #[test]
    fn test_truncated_input() {
        let message = NdefMessage::new(vec![text_record(&[0x02, b'e', b'n', b'h', b'i'])]);
        let bytes = encode_message(&message).unwrap();

        for cut in 1..bytes.len() {
            assert!(
                matches!(
                    decode_message(&bytes[..cut]),
                    Err(WireError::InsufficientData { .. })
                ),
                "cut at {} should be insufficient data",
                cut
            );
        }
    }

    #[test]
    fn test_type_too_long_rejected() {
        let message = NdefMessage::new(vec![RawRecord::new(
            Tnf::External,
            vec![b'x'; 256],
            Vec::new(),
            Vec::new(),
        )]);
        assert_eq!(
            encode_message(&message),
            Err(WireError::FieldTooLong {
                field: "type",
                len: 256
            })
        );
    }
}
