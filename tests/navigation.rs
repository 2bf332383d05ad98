//! Keyboard and mouse navigation tests

mod common;

use common::{
    click, focus, order_schema, pos, press, press_all, runtime_with_new_rows, test_runtime,
    text_number_schema,
};
use ordergrid::grid::SelectionRange;
use ordergrid::messages::{GridMsg, Msg};

fn three_by_two() -> common::TestRuntime {
    test_runtime(
        text_number_schema(),
        &[&["A", "1"], &["B", "2"], &["C", "3"]],
    )
}

// ========================================================================
// Arrow keys
// ========================================================================

#[test]
fn test_arrows_move_and_collapse() {
    let mut rt = three_by_two();
    press(&mut rt, "down");
    press(&mut rt, "right");

    assert_eq!(focus(&rt), pos(1, 1));
    assert_eq!(rt.selection(), SelectionRange::cell(pos(1, 1)));
}

#[test]
fn test_arrows_clamp_at_edges() {
    let mut rt = three_by_two();
    press_all(&mut rt, &["up", "left"]);
    assert_eq!(focus(&rt), pos(0, 0));

    press_all(&mut rt, &["down", "down", "down", "down", "right", "right", "right"]);
    assert_eq!(focus(&rt), pos(2, 1));
}

#[test]
fn test_arrow_collapses_extended_selection() {
    let mut rt = three_by_two();
    press_all(&mut rt, &["shift+down", "shift+right"]);
    assert_eq!(rt.selection().height(), 2);
    assert_eq!(rt.selection().width(), 2);

    press(&mut rt, "up");
    assert_eq!(rt.selection(), SelectionRange::cell(pos(0, 1)));
}

#[test]
fn test_focus_stays_in_bounds_for_any_key_sequence() {
    let mut rt = test_runtime(
        order_schema(),
        &[&["a", "1", "1", "Draft"], &["b", "2", "2", "Draft"]],
    );
    let keys = ["up", "down", "left", "right", "tab", "shift+tab"];

    // Deterministic pseudo-random walk
    let mut seed: u32 = 17;
    for _ in 0..500 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let key = keys[(seed >> 16) as usize % keys.len()];
        press(&mut rt, key);

        let f = focus(&rt);
        assert!(f.row < 2 && f.col < 4, "focus {:?} out of bounds after {}", f, key);
    }
}

// ========================================================================
// Shift+Arrow
// ========================================================================

#[test]
fn test_shift_arrows_extend_from_anchor() {
    let mut rt = three_by_two();
    press(&mut rt, "down");
    press_all(&mut rt, &["shift+down", "shift+right"]);

    let range = rt.selection();
    assert_eq!(range.anchor, pos(1, 0));
    assert_eq!(range.focus, pos(2, 1));
    assert_eq!(range.top_left(), pos(1, 0));
    assert_eq!(range.bottom_right(), pos(2, 1));
}

#[test]
fn test_shift_arrow_past_edge_clamps() {
    let mut rt = three_by_two();
    press_all(&mut rt, &["shift+up", "shift+left"]);
    assert!(rt.selection().is_single_cell());
}

// ========================================================================
// Tab / Shift+Tab
// ========================================================================

#[test]
fn test_tab_wraps_to_next_row() {
    let mut rt = three_by_two();
    press(&mut rt, "tab");
    assert_eq!(focus(&rt), pos(0, 1));
    press(&mut rt, "tab");
    assert_eq!(focus(&rt), pos(1, 0));
}

#[test]
fn test_tab_at_last_cell_stays() {
    let mut rt = three_by_two();
    press(&mut rt, "cmd+end");
    assert_eq!(focus(&rt), pos(2, 1));
    press(&mut rt, "tab");
    assert_eq!(focus(&rt), pos(2, 1));
}

#[test]
fn test_shift_tab_wraps_backwards() {
    let mut rt = three_by_two();
    press(&mut rt, "down");
    press(&mut rt, "shift+tab");
    assert_eq!(focus(&rt), pos(0, 1));
    press_all(&mut rt, &["shift+tab", "shift+tab"]);
    assert_eq!(focus(&rt), pos(0, 0));
}

#[test]
fn test_tab_collapses_selection() {
    let mut rt = three_by_two();
    press(&mut rt, "shift+down");
    press(&mut rt, "tab");
    assert!(rt.selection().is_single_cell());
}

// ========================================================================
// Home / End
// ========================================================================

#[test]
fn test_home_end_and_grid_corners() {
    let mut rt = test_runtime(
        order_schema(),
        &[&["a", "1", "1", "Draft"], &["b", "2", "2", "Draft"]],
    );
    press(&mut rt, "end");
    assert_eq!(focus(&rt), pos(0, 3));
    press(&mut rt, "home");
    assert_eq!(focus(&rt), pos(0, 0));
    press(&mut rt, "cmd+end");
    assert_eq!(focus(&rt), pos(1, 3));
    press(&mut rt, "cmd+home");
    assert_eq!(focus(&rt), pos(0, 0));
}

// ========================================================================
// Mouse
// ========================================================================

#[test]
fn test_drag_selects_normalized_rectangle() {
    let mut rt = three_by_two();
    rt.dispatch(Msg::mouse_down(2, 1));
    rt.dispatch(Msg::Grid(GridMsg::MouseDrag { row: 0, col: 0 }));
    rt.dispatch(Msg::Grid(GridMsg::MouseUp));

    let range = rt.selection();
    assert_eq!(range.anchor, pos(2, 1));
    assert_eq!(range.focus, pos(0, 0));
    assert_eq!(range.top_left(), pos(0, 0));
    assert_eq!(range.bottom_right(), pos(2, 1));
    assert!(!rt.grid().selection().is_selecting());
}

#[test]
fn test_drag_after_release_is_ignored() {
    let mut rt = three_by_two();
    click(&mut rt, 1, 1);
    rt.dispatch(Msg::Grid(GridMsg::MouseDrag { row: 2, col: 0 }));
    assert_eq!(rt.selection(), SelectionRange::cell(pos(1, 1)));
}

#[test]
fn test_click_out_of_bounds_clamps() {
    let mut rt = three_by_two();
    click(&mut rt, 40, 9);
    assert_eq!(focus(&rt), pos(2, 1));
}

// ========================================================================
// Empty grid
// ========================================================================

#[test]
fn test_navigation_on_empty_grid_is_noop() {
    let mut rt = test_runtime(text_number_schema(), &[]);
    press_all(&mut rt, &["down", "tab", "shift+right", "cmd+end", "enter", "delete"]);
    click(&mut rt, 3, 3);

    assert_eq!(rt.rows().len(), 0);
    assert!(rt.editing().is_none());
}

#[test]
fn test_first_added_row_gets_focus() {
    let rt = runtime_with_new_rows(text_number_schema(), 1);
    assert_eq!(focus(&rt), pos(0, 0));
    assert!(rt.grid().in_bounds(focus(&rt)));
}
