//! Dirty tracking, save and delete tests against an in-memory store

mod common;

use common::{
    cell, focus, pos, press, press_all, runtime_with_new_rows, test_runtime, text_number_schema,
};
use ordergrid::grid::{CellValue, RowId, SyncError};

fn persisted_three() -> common::TestRuntime {
    test_runtime(
        text_number_schema(),
        &[&["A", "1"], &["B", "2"], &["C", "3"]],
    )
}

/// Type `text` into column 0 of every row
fn touch_all_rows(rt: &mut common::TestRuntime, text: &str) {
    press(rt, "cmd+home");
    for _ in 0..rt.rows().len() {
        rt.type_text(text);
        press(rt, "enter");
    }
}

// ========================================================================
// Save
// ========================================================================

#[test]
fn test_save_with_nothing_dirty() {
    let mut rt = persisted_three();
    let outcome = rt.save();

    assert!(outcome.is_success());
    assert_eq!(outcome.attempted, 0);
    assert_eq!(outcome.committed, 0);
    assert!(rt.store().calls.is_empty());
}

#[test]
fn test_save_creates_new_rows_and_assigns_ids() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 2);
    touch_all_rows(&mut rt, "N");
    assert!(matches!(rt.rows()[0].id(), RowId::Local(_)));
    assert!(rt.rows()[0].id().to_string().starts_with("local:"));

    let outcome = rt.save();

    assert!(outcome.is_success());
    assert_eq!(outcome.committed, 2);
    assert_eq!(rt.store().calls, vec!["create", "create"]);
    for row in rt.rows() {
        assert!(!row.is_dirty());
        assert!(row.id().persisted().is_some_and(|id| id.starts_with("mem-")));
    }
    assert_eq!(rt.store().rows.len(), 2);
}

#[test]
fn test_save_updates_modified_rows_in_order() {
    let mut rt = persisted_three();
    press_all(&mut rt, &["down", "down"]);
    rt.type_text("Z");
    press_all(&mut rt, &["enter", "cmd+home"]);
    rt.type_text("Y");
    press(&mut rt, "enter");

    let outcome = rt.save();
    assert_eq!(outcome.committed, 2);
    assert_eq!(rt.store().calls, vec!["update:id-0", "update:id-2"]);
    assert_eq!(
        rt.store().record("id-2").unwrap()["name"],
        CellValue::text("Z")
    );
}

#[test]
fn test_save_stops_at_first_failure() {
    let mut rt = persisted_three();
    touch_all_rows(&mut rt, "X");
    rt.store_mut().fail_updates.push("id-1".to_string());

    let outcome = rt.save();

    assert!(!outcome.is_success());
    assert_eq!(outcome.attempted, 3);
    assert_eq!(outcome.committed, 1);
    assert!(matches!(outcome.error, Some(SyncError::Update { ref id, .. }) if id == "id-1"));

    // Row 3 was never attempted
    assert_eq!(rt.store().calls, vec!["update:id-0", "update:id-1"]);
    assert!(!rt.rows()[0].is_dirty());
    assert!(rt.rows()[1].is_dirty());
    assert!(rt.rows()[2].is_dirty());
    assert_eq!(rt.model().error_notices().count(), 1);
}

#[test]
fn test_retry_after_failure_saves_remaining_rows() {
    let mut rt = persisted_three();
    touch_all_rows(&mut rt, "X");
    rt.store_mut().fail_updates.push("id-1".to_string());
    rt.save();

    rt.store_mut().fail_updates.clear();
    let outcome = rt.save();

    assert!(outcome.is_success());
    assert_eq!(outcome.committed, 2);
    assert!(rt.rows().iter().all(|r| !r.is_dirty()));
}

#[test]
fn test_save_mixes_creates_and_updates() {
    let mut rt = persisted_three();
    press(&mut rt, "cmd+shift+n");
    press(&mut rt, "cmd+end");
    rt.type_text("D");
    press_all(&mut rt, &["enter", "cmd+home"]);
    rt.type_text("A2");
    press(&mut rt, "enter");

    let outcome = rt.save();
    assert_eq!(outcome.committed, 2);
    assert_eq!(rt.store().calls, vec!["update:id-0", "create"]);
}

#[test]
fn test_failed_create_keeps_placeholder_id() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 1);
    rt.type_text("N");
    press(&mut rt, "enter");
    rt.store_mut().fail_creates = true;

    let outcome = rt.save();
    assert!(matches!(outcome.error, Some(SyncError::Create { .. })));
    assert!(rt.rows()[0].is_new());
    assert!(rt.rows()[0].id().is_placeholder());
}

#[test]
fn test_save_commits_active_edit() {
    let mut rt = persisted_three();
    rt.type_text("Q");
    let outcome = rt.save();

    assert!(rt.editing().is_none());
    assert_eq!(outcome.committed, 1);
    assert_eq!(cell(&rt, 0, 0), CellValue::text("Q"));
}

#[test]
fn test_new_row_saved_even_when_blank() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 1);
    let outcome = rt.save();
    assert_eq!(outcome.committed, 1);
    let id = rt.rows()[0].id().persisted().unwrap().to_string();
    assert_eq!(
        rt.store().record(&id).unwrap()["qty"],
        CellValue::Empty
    );
}

// ========================================================================
// Row removal
// ========================================================================

#[test]
fn test_remove_new_row_is_local() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 2);
    press(&mut rt, "cmd+shift+backspace");

    assert_eq!(rt.rows().len(), 1);
    assert!(rt.store().calls.is_empty());
}

#[test]
fn test_remove_persisted_row_deletes_remotely() {
    let mut rt = persisted_three();
    press(&mut rt, "down");
    press(&mut rt, "cmd+shift+backspace");

    assert_eq!(rt.store().calls, vec!["delete:id-1"]);
    assert_eq!(rt.rows().len(), 2);
    assert_eq!(cell(&rt, 1, 0), CellValue::text("C"));
    assert_eq!(focus(&rt), pos(1, 0));
}

#[test]
fn test_failed_delete_keeps_row() {
    let mut rt = persisted_three();
    rt.store_mut().fail_deletes = true;
    rt.remove_row(2);

    assert_eq!(rt.rows().len(), 3);
    assert_eq!(cell(&rt, 2, 0), CellValue::text("C"));
    assert_eq!(rt.model().error_notices().count(), 1);
}

#[test]
fn test_remove_last_row_clamps_selection() {
    let mut rt = persisted_three();
    press(&mut rt, "cmd+end");
    press(&mut rt, "cmd+shift+backspace");

    assert_eq!(rt.rows().len(), 2);
    assert_eq!(focus(&rt), pos(1, 1));
}

#[test]
fn test_remove_row_under_edit_discards_edit() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 2);
    press(&mut rt, "down");
    rt.type_text("gone");
    rt.remove_row(1);

    assert!(rt.editing().is_none());
    assert_eq!(rt.rows().len(), 1);
    assert_eq!(cell(&rt, 0, 0), CellValue::Empty);
}

#[test]
fn test_remove_other_row_commits_edit() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 2);
    press(&mut rt, "down");
    rt.type_text("kept");
    rt.remove_row(0);

    assert!(rt.editing().is_none());
    assert_eq!(rt.rows().len(), 1);
    assert_eq!(cell(&rt, 0, 0), CellValue::text("kept"));
    assert_eq!(focus(&rt), pos(0, 0));
}

// ========================================================================
// Load
// ========================================================================

#[test]
fn test_load_failure_is_reported() {
    let mut rt = persisted_three();
    rt.store_mut().fail_load = true;

    assert!(matches!(rt.load(), Err(SyncError::Load { .. })));
    assert_eq!(rt.rows().len(), 3);
    assert_eq!(rt.model().error_notices().count(), 1);
}

#[test]
fn test_reload_reflects_saved_rows() {
    let mut rt = runtime_with_new_rows(text_number_schema(), 1);
    rt.type_text("Kit");
    press(&mut rt, "enter");
    rt.save();

    assert_eq!(rt.load().unwrap(), 1);
    assert_eq!(cell(&rt, 0, 0), CellValue::text("Kit"));
    assert!(!rt.rows()[0].is_dirty());
}
