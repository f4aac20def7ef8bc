//! Unknown tag diagnostics
//!
//! When a tag carries no readable text, the caller still gets something to
//! show: a few summary lines and a single-record message wrapping a dump
//! of the tag's identity and technology metadata.

use nfctool_core::{short_tech_name, NdefMessage, RawRecord, TagHandle, TagTechnology, Tnf};
use tracing::debug;

/// Diagnostics for a tag without text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTagReport {
    /// `Tag ID`, `Supported technologies` and `Payload` lines
    pub lines: Vec<String>,
    /// One record of TNF unknown whose id is the tag id and whose payload
    /// is the dump
    pub message: NdefMessage,
}

/// Build the diagnostics for `tag`. Never fails.
pub fn unknown_tag_report(tag: &dyn TagHandle) -> UnknownTagReport {
    let id = tag.id();
    let dump = dump_tag(tag);

    let lines = vec![
        format!("Tag ID: {}", tag_id_hex(id)),
        format!("Supported technologies: {}", tag.tech_list().join(", ")),
        format!("Payload: {}", dump),
    ];

    let record = RawRecord::new(Tnf::Unknown, Vec::new(), id.to_vec(), dump.into_bytes());
    debug!(target: "nfctool::diagnostics", id = %tag_id_hex(id), "Built unknown tag report");

    UnknownTagReport {
        lines,
        message: NdefMessage::new(vec![record]),
    }
}

/// Identifier as contiguous uppercase hex, `"Unknown ID"` when empty
pub fn tag_id_hex(id: &[u8]) -> String {
    if id.is_empty() {
        return "Unknown ID".to_string();
    }
    id.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Identifier in reverse byte order as colon-separated uppercase hex
///
/// `[0x04, 0xA1, 0x3F]` becomes `"3F:A1:04"`.
pub fn reversed_hex(id: &[u8]) -> String {
    id.iter()
        .rev()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Human-readable dump of a tag's identity and technology metadata
pub fn dump_tag(tag: &dyn TagHandle) -> String {
    let tech_list = tag.tech_list();
    let short_names: Vec<&str> = tech_list.iter().map(|t| short_tech_name(t)).collect();

    let mut lines = vec![
        format!("Serial number: {}", reversed_hex(tag.id())),
        format!("Technologies: {}", short_names.join(", ")),
    ];

    for tech in TagTechnology::from_names(tech_list) {
        match tech {
            TagTechnology::MifareClassic => match tag.mifare_classic_info() {
                Some(Ok(info)) => {
                    lines.push(format!("Mifare Classic type: {}", info.kind));
                    lines.push(format!(
                        "Mifare size: {} bytes / sectors: {} / blocks: {}",
                        info.size, info.sector_count, info.block_count
                    ));
                }
                Some(Err(e)) => lines.push(format!("Mifare classic error: {}", e)),
                None => lines.push("Mifare Classic type: Unknown".to_string()),
            },
            TagTechnology::MifareUltralight => {
                let kind = tag
                    .mifare_ultralight_info()
                    .map(|info| info.kind.to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                lines.push(format!("Mifare Ultralight type: {}", kind));
            }
            TagTechnology::Ndef | TagTechnology::Other => {}
        }
    }

    lines.join("\n")
}
