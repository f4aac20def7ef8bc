//! Size limits imposed by the NDEF formats
//!
//! These are format limits, not tunables: changing them would produce
//! records other readers cannot parse.

/// Maximum language code length: the status byte has a 6-bit length field
pub const MAX_LANGUAGE_CODE_LEN: usize = 0x3F;

/// Largest payload that fits a short record (1-byte payload length)
pub const MAX_SHORT_RECORD_PAYLOAD: usize = 0xFF;

/// Maximum type field length (1-byte length)
pub const MAX_TYPE_LEN: usize = 0xFF;

/// Maximum id field length (1-byte length)
pub const MAX_ID_LEN: usize = 0xFF;

/// True if `code` can be stored as a text record language code
///
/// Language codes are 7-bit ASCII and at most 63 bytes long.
pub fn is_valid_language_code(code: &str) -> bool {
    code.len() <= MAX_LANGUAGE_CODE_LEN && code.is_ascii()
}
