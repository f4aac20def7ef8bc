//! Shared test utilities for the root integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use nfctool::codec::message;
use nfctool::engine::testing::{MockSession, MockTag};
use nfctool::{MemoryBackupStore, NdefMessage, NfcConfig, TagManager};

/// Manager with the default config and an in-memory backup slot
pub fn memory_manager() -> TagManager {
    TagManager::new(NfcConfig::default(), Arc::new(MemoryBackupStore::new()))
}

/// Manager whose backup slot lives in `dir/backup.json`
pub fn file_manager(dir: &Path) -> TagManager {
    let config = NfcConfig {
        backup_file: Some(dir.join("backup.json")),
        ..NfcConfig::default()
    };
    TagManager::from_config(config).expect("valid config")
}

/// Message of English text records
pub fn text_message(items: &[&str]) -> NdefMessage {
    message::encode(items, "en").expect("valid language code")
}

/// Owned copies of `items`
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Content of a typical product tag
pub fn product_content() -> NdefMessage {
    text_message(&["FI0047|:|102", "Deadbolt"])
}

/// NFC-A tag exposing NDEF, holding `content`
pub fn product_tag(content: NdefMessage) -> MockTag {
    MockTag::ndef(
        vec![0x04, 0xA1, 0x3F],
        MockSession::new().with_cached_message(content),
    )
}
