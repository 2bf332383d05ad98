//! Grid update functions
//!
//! Handles GridMsg: navigation, mouse selection, the inline editor and row
//! structure. Arrow navigation is suppressed while a cell is being edited;
//! every other focus change commits the active edit first.

use crate::commands::Cmd;
use crate::grid::{CellPosition, CellWriteError, GridState};
use crate::messages::{Direction, GridMsg};
use crate::model::AppModel;

/// Handle grid messages
pub fn update_grid(model: &mut AppModel, msg: GridMsg) -> Option<Cmd> {
    match msg {
        GridMsg::Move(direction) => move_focus(model, direction),
        GridMsg::Extend(direction) => extend_focus(model, direction),
        GridMsg::NextCell => navigate(model, GridState::move_to_next_cell),
        GridMsg::PrevCell => navigate(model, GridState::move_to_prev_cell),
        GridMsg::RowStart => navigate(model, GridState::move_to_row_start),
        GridMsg::RowEnd => navigate(model, GridState::move_to_row_end),
        GridMsg::FirstCell => navigate(model, GridState::move_to_first_cell),
        GridMsg::LastCell => navigate(model, GridState::move_to_last_cell),

        GridMsg::MouseDown { row, col } => mouse_down(model, CellPosition::new(row, col)),
        GridMsg::MouseDrag { row, col } => {
            if model.grid.extend_selection(CellPosition::new(row, col)) {
                Some(Cmd::Redraw)
            } else {
                None
            }
        }
        GridMsg::MouseUp => {
            model.grid.end_selection();
            None
        }
        GridMsg::DoubleClick { row, col } => double_click(model, CellPosition::new(row, col)),

        GridMsg::StartEditing => redraw_if(model.grid.start_editing()),
        GridMsg::StartEditingWithChar(ch) => start_editing_with_char(model, ch),
        GridMsg::ConfirmEdit => confirm_edit(model),
        GridMsg::CancelEdit => cancel_edit(model),
        GridMsg::Blur => redraw_if(commit_active_edit(model)),
        GridMsg::EditInsertChar(ch) => edit(model, |e| e.insert_char(ch)),
        GridMsg::EditInsertText(text) => edit(model, |e| e.insert_text(&text)),
        GridMsg::EditDeleteBackward => edit(model, |e| e.delete_backward()),
        GridMsg::EditDeleteForward => edit(model, |e| e.delete_forward()),
        GridMsg::EditCursorLeft => edit(model, |e| e.cursor_left()),
        GridMsg::EditCursorRight => edit(model, |e| e.cursor_right()),
        GridMsg::EditCursorHome => edit(model, |e| e.cursor_home()),
        GridMsg::EditCursorEnd => edit(model, |e| e.cursor_end()),

        GridMsg::ClearSelection => clear_selection(model),
        GridMsg::AddRow => add_row(model),
        GridMsg::RemoveRow(index) => remove_row(model, index),
        GridMsg::RemoveFocusedRow => {
            if !model.grid.has_cells() {
                return None;
            }
            let row = model.grid.focus().row;
            remove_row(model, row)
        }
    }
}

fn redraw_if(changed: bool) -> Option<Cmd> {
    changed.then_some(Cmd::Redraw)
}

/// Leave edit mode keeping the typed value (blur)
///
/// Returns whether an edit was active. A rejected value produces a notice
/// and leaves the cell unchanged.
pub(super) fn commit_active_edit(model: &mut AppModel) -> bool {
    if !model.grid.is_editing() {
        return false;
    }

    match model.grid.commit_edit() {
        Ok(Some(edit)) => {
            tracing::debug!(
                row = edit.position.row,
                col = edit.position.col,
                old = %edit.old_value,
                new = %edit.new_value,
                "cell edited"
            );
        }
        Ok(None) => {}
        Err(CellWriteError::Rejected(e)) => model.notify_error(e.to_string()),
        Err(e) => tracing::warn!("inline edit not written: {}", e),
    }
    true
}

// === Navigation ===

/// Arrow keys: consumed by the inline input while editing
fn move_focus(model: &mut AppModel, direction: Direction) -> Option<Cmd> {
    if model.grid.is_editing() || !model.grid.has_cells() {
        return None;
    }
    let (dr, dc) = direction.delta();
    model.grid.move_selection(dr, dc);
    Some(Cmd::Redraw)
}

fn extend_focus(model: &mut AppModel, direction: Direction) -> Option<Cmd> {
    if model.grid.is_editing() || !model.grid.has_cells() {
        return None;
    }
    let (dr, dc) = direction.delta();
    model.grid.extend_selection_by(dr, dc);
    Some(Cmd::Redraw)
}

/// Tab, Shift+Tab, Home/End and Ctrl+Home/End: exit edit mode first
fn navigate(model: &mut AppModel, movement: fn(&mut GridState)) -> Option<Cmd> {
    if !model.grid.has_cells() {
        return None;
    }
    commit_active_edit(model);
    movement(&mut model.grid);
    Some(Cmd::Redraw)
}

// === Mouse ===

fn mouse_down(model: &mut AppModel, pos: CellPosition) -> Option<Cmd> {
    let was_editing = commit_active_edit(model);
    if !model.grid.has_cells() {
        return redraw_if(was_editing);
    }
    model.grid.begin_selection(pos);
    Some(Cmd::Redraw)
}

fn double_click(model: &mut AppModel, pos: CellPosition) -> Option<Cmd> {
    if model.grid.editing_position() == Some(model.grid.clamp(pos)) {
        return None;
    }
    let was_editing = commit_active_edit(model);
    model.grid.end_selection();
    redraw_if(model.grid.start_editing_at(pos) || was_editing)
}

// === Editing ===

fn start_editing_with_char(model: &mut AppModel, ch: char) -> Option<Cmd> {
    if model.grid.is_editing() {
        return edit(model, |e| e.insert_char(ch));
    }
    redraw_if(model.grid.start_editing_with_char(ch))
}

/// Enter while editing: commit and move one row down (clamped)
fn confirm_edit(model: &mut AppModel) -> Option<Cmd> {
    if !commit_active_edit(model) {
        return None;
    }
    model.grid.move_selection(1, 0);
    Some(Cmd::Redraw)
}

/// Escape while editing: discard the buffer, focus stays
fn cancel_edit(model: &mut AppModel) -> Option<Cmd> {
    if !model.grid.is_editing() {
        return None;
    }
    model.grid.cancel_edit();
    Some(Cmd::Redraw)
}

fn edit(
    model: &mut AppModel,
    f: impl FnOnce(&mut crate::grid::CellEditState),
) -> Option<Cmd> {
    let editor = model.grid.editor_mut()?;
    f(editor);
    Some(Cmd::Redraw)
}

// === Cells and rows ===

/// Delete/Backspace while navigating: clear the whole rectangle
fn clear_selection(model: &mut AppModel) -> Option<Cmd> {
    if model.grid.is_editing() {
        return None;
    }
    let cleared = model.grid.clear_selection();
    tracing::debug!(cleared, "cleared selection");
    redraw_if(cleared > 0)
}

fn add_row(model: &mut AppModel) -> Option<Cmd> {
    commit_active_edit(model);
    let index = model.grid.add_row();
    tracing::debug!(index, "row appended");
    Some(Cmd::Redraw)
}

/// Remove a row: unsaved rows go immediately, persisted rows only after
/// the remote delete succeeds
fn remove_row(model: &mut AppModel, index: usize) -> Option<Cmd> {
    if model.grid.editing_position().map(|p| p.row) == Some(index) {
        model.grid.cancel_edit();
    } else {
        commit_active_edit(model);
    }

    let row = model.grid.store().row(index)?;
    if row.is_new() {
        model.grid.remove_local_row(index);
        return Some(Cmd::Redraw);
    }

    let key = row.key();
    let Some(id) = row.id().persisted().map(str::to_string) else {
        tracing::warn!(index, "persisted row without id");
        return None;
    };
    tracing::debug!(index, %id, "requesting remote delete");
    Some(Cmd::DeleteRow { key, id })
}
