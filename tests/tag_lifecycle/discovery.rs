//! Discovery events

use nfctool::engine::testing::MockTag;
use nfctool::{DiscoveryAction, DiscoveryOutcome, PendingWrite, TagDiscovery};

use crate::common::*;

#[test]
fn discovery_read_then_pending_write() {
    let manager = memory_manager();

    let mut tag = product_tag(product_content());
    let outcome = manager.dispatch(
        TagDiscovery {
            action: DiscoveryAction::from_action("android.nfc.action.NDEF_DISCOVERED"),
            tag: &mut tag,
            messages: vec![product_content()],
        },
        None,
    );
    let messages = match outcome {
        DiscoveryOutcome::Read {
            texts, messages, ..
        } => {
            assert_eq!(texts, strings(&["FI0047|:|102", "Deadbolt"]));
            messages
        }
        other => panic!("expected read, got {:?}", other),
    };

    // The user edits the second record, then taps the tag again
    let pending = PendingWrite {
        index: 1,
        new_text: "Lever".into(),
    };
    let mut tag = product_tag(product_content());
    let outcome = manager.dispatch(
        TagDiscovery {
            action: DiscoveryAction::NdefDiscovered,
            tag: &mut tag,
            messages,
        },
        Some(&pending),
    );
    match outcome {
        DiscoveryOutcome::Written { writable, report } => {
            assert!(writable);
            assert!(report.is_success());
        }
        other => panic!("expected write, got {:?}", other),
    }
}

#[test]
fn discovery_of_foreign_tag_yields_diagnostics() {
    let manager = memory_manager();
    let mut tag = MockTag::new(
        vec![0x04, 0xA1, 0x3F],
        &["android.nfc.tech.NfcA", "android.nfc.tech.IsoDep"],
    );

    let outcome = manager.dispatch(
        TagDiscovery {
            action: DiscoveryAction::TechDiscovered,
            tag: &mut tag,
            messages: Vec::new(),
        },
        None,
    );

    match outcome {
        DiscoveryOutcome::Unknown { writable, report } => {
            assert!(!writable);
            assert_eq!(
                report.lines,
                vec![
                    "Tag ID: 04A13F".to_string(),
                    "Supported technologies: android.nfc.tech.NfcA, android.nfc.tech.IsoDep"
                        .to_string(),
                    "Payload: Serial number: 3F:A1:04\nTechnologies: NfcA, IsoDep".to_string(),
                ]
            );
        }
        other => panic!("expected diagnostics, got {:?}", other),
    }
}
