//! Reading tags

use nfctool::engine::testing::{MockSession, MockTag};
use nfctool::{ProductTag, TagTechnology};
use tempfile::TempDir;

use crate::common::*;

#[test]
fn read_product_tag() {
    let manager = memory_manager();
    let mut tag = product_tag(product_content());

    let texts = manager.read_from_tag(&mut tag);
    assert_eq!(texts, strings(&["FI0047|:|102", "Deadbolt"]));

    let product = ProductTag::from_texts(&texts);
    assert_eq!(product.catalog_path.as_deref(), Some("FI0047/FI0047_102"));
    assert_eq!(product.type_content.as_deref(), Some("Deadbolt"));
}

#[test]
fn read_saves_backup_for_later_repair() {
    let manager = memory_manager();
    manager.read_from_tag(&mut product_tag(product_content()));

    let mut blank = MockTag::ndef(vec![0x04, 0xA1, 0x3F], MockSession::new());
    assert_eq!(
        manager.read_from_tag(&mut blank),
        strings(&["FI0047|:|102", "Deadbolt"])
    );
    assert_eq!(
        blank.mock_session(TagTechnology::Ndef).unwrap().content(),
        Some(&product_content())
    );
}

#[test]
fn reset_backup_stops_repair() {
    let manager = memory_manager();
    manager.read_from_tag(&mut product_tag(product_content()));
    assert!(manager.reset_backup().unwrap());

    let mut blank = MockTag::ndef(vec![1], MockSession::new());
    assert!(manager.read_from_tag(&mut blank).is_empty());
}

#[test]
fn file_backup_repairs_after_restart() {
    let dir = TempDir::new().unwrap();
    {
        let manager = file_manager(dir.path());
        manager.read_from_tag(&mut product_tag(product_content()));
    }

    let manager = file_manager(dir.path());
    let mut blank = MockTag::ndef(vec![1], MockSession::new());
    assert_eq!(
        manager.read_from_tag(&mut blank),
        strings(&["FI0047|:|102", "Deadbolt"])
    );
}
