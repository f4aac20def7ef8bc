//! Editing tags

use nfctool::engine::testing::MockSession;
use nfctool::engine::testing::MockTag;
use nfctool::{FailureKind, SessionError, TagTechnology, WriteState};

use crate::common::*;

#[test]
fn read_edit_read_cycle() {
    let manager = memory_manager();
    let mut tag = product_tag(product_content());

    let texts = manager.read_from_tag(&mut tag);
    let report = manager.write_to_tag(&mut tag, &texts, 0, "FI0047|:|103");
    assert!(report.is_success());
    assert_eq!(report.path.last(), Some(&WriteState::Closed));

    let written = tag
        .mock_session(TagTechnology::Ndef)
        .unwrap()
        .content()
        .cloned()
        .unwrap();
    assert_eq!(written, text_message(&["FI0047|:|103", "Deadbolt"]));

    // The next discovery sees the new content
    let mut next = product_tag(written);
    assert_eq!(
        manager.read_from_tag(&mut next),
        strings(&["FI0047|:|103", "Deadbolt"])
    );
}

#[test]
fn interrupted_write_leaves_original_content() {
    let manager = memory_manager();
    let mut tag = MockTag::ndef(
        vec![1],
        MockSession::new()
            .with_cached_message(product_content())
            .fail_write(SessionError::TagLost),
    );

    let report = manager.write_to_tag(&mut tag, &strings(&["FI0047|:|102", "Deadbolt"]), 1, "Lever");

    assert_eq!(report.failure_kind(), Some(FailureKind::Write));
    assert!(report.visited(WriteState::RestoreAttempted));
    assert_eq!(
        tag.mock_session(TagTechnology::Ndef).unwrap().content(),
        Some(&product_content())
    );
}

#[test]
fn read_only_tag_reports_write_failure() {
    let manager = memory_manager();
    let mut tag = MockTag::ndef(
        vec![1],
        MockSession::new()
            .with_cached_message(product_content())
            .writable(false),
    );
    assert!(!manager.is_tag_writable(&mut tag));

    let report = manager.write_to_tag(&mut tag, &strings(&["a", "b"]), 0, "x");
    let failure = report.outcome.unwrap_err();
    assert!(matches!(
        failure.kind(),
        FailureKind::Write | FailureKind::Restore
    ));
    assert!(failure.to_string().contains("read-only"));
}
