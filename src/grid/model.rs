//! Grid state: store, selection and inline editor behind one mutation API
//!
//! Bounds, editing/focus exclusion and dirty-flag semantics are enforced here
//! and nowhere else.

use super::editing::{CellEdit, CellEditState};
use super::selection::{CellPosition, SelectionModel, SelectionRange};
use super::store::{CellWriteError, GridStore, Row};

/// State for the order grid view
#[derive(Debug, Clone)]
pub struct GridState {
    store: GridStore,
    selection: SelectionModel,
    /// Cell editing state (Some when editing a cell)
    editing: Option<CellEditState>,
}

impl GridState {
    pub fn new(store: GridStore) -> Self {
        Self {
            store,
            selection: SelectionModel::new(),
            editing: None,
        }
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn editing(&self) -> Option<&CellEditState> {
        self.editing.as_ref()
    }

    /// Position under edit, if any
    pub fn editing_position(&self) -> Option<CellPosition> {
        self.editing.as_ref().map(|e| e.position)
    }

    pub fn focus(&self) -> CellPosition {
        self.selection.focus()
    }

    pub fn row_count(&self) -> usize {
        self.store.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.store.column_count()
    }

    /// Grid has at least one addressable cell
    pub fn has_cells(&self) -> bool {
        self.row_count() > 0 && self.column_count() > 0
    }

    pub fn in_bounds(&self, pos: CellPosition) -> bool {
        pos.row < self.row_count() && pos.col < self.column_count()
    }

    pub fn clamp(&self, pos: CellPosition) -> CellPosition {
        pos.clamped(self.row_count(), self.column_count())
    }

    /// Cell is inside the current selection rectangle
    pub fn is_in_range(&self, pos: CellPosition) -> bool {
        self.in_bounds(pos) && self.selection.is_in_range(pos)
    }

    /// Cell is the focused cell
    pub fn is_focus(&self, pos: CellPosition) -> bool {
        self.in_bounds(pos) && self.selection.is_focus(pos)
    }

    /// Current selection rectangle
    pub fn selection_range(&self) -> SelectionRange {
        self.selection.range()
    }

    // === Selection ===

    /// Start a selection at `pos` (clamped)
    pub fn begin_selection(&mut self, pos: CellPosition) {
        if !self.has_cells() {
            return;
        }
        let pos = self.clamp(pos);
        self.selection.begin(pos);
    }

    /// Extend the in-progress selection to `pos` (clamped)
    pub fn extend_selection(&mut self, pos: CellPosition) -> bool {
        if !self.has_cells() {
            return false;
        }
        let pos = self.clamp(pos);
        self.selection.extend(pos)
    }

    pub fn end_selection(&mut self) {
        self.selection.end();
    }

    /// Collapse the selection onto a single cell
    pub fn select_cell(&mut self, pos: CellPosition) {
        if !self.has_cells() {
            return;
        }
        let pos = self.clamp(pos);
        self.selection.collapse_to(pos);
    }

    /// Move the focus corner only, keeping the anchor
    pub(super) fn set_focus_keep_anchor(&mut self, pos: CellPosition) {
        self.selection.set_focus(pos);
    }

    // === Editing ===

    /// Check if currently editing a cell
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Start editing the focused cell
    pub fn start_editing(&mut self) -> bool {
        self.start_editing_at(self.focus())
    }

    /// Start editing at `pos`, moving focus there first
    pub fn start_editing_at(&mut self, pos: CellPosition) -> bool {
        if self.is_editing() || !self.has_cells() {
            return false;
        }
        let pos = self.clamp(pos);
        self.selection.collapse_to(pos);

        let value = self.store.get(pos.row, pos.col).to_string();
        self.editing = Some(CellEditState::new(pos, value));
        true
    }

    /// Start editing the focused cell with an initial character
    pub fn start_editing_with_char(&mut self, ch: char) -> bool {
        if self.is_editing() || !self.has_cells() {
            return false;
        }
        let pos = self.focus();
        self.selection.collapse_to(pos);

        let original = self.store.get(pos.row, pos.col).to_string();
        self.editing = Some(CellEditState::with_char(pos, original, ch));
        true
    }

    /// Inline editor, for buffer operations
    pub fn editor_mut(&mut self) -> Option<&mut CellEditState> {
        self.editing.as_mut()
    }

    /// Leave edit mode keeping the typed value
    ///
    /// Unchanged buffers perform no write. A rejected value leaves the cell
    /// untouched and edit mode is still left.
    pub fn commit_edit(&mut self) -> Result<Option<CellEdit>, CellWriteError> {
        let Some(edit_state) = self.editing.take() else {
            return Ok(None);
        };

        if !edit_state.is_modified() {
            return Ok(None);
        }

        let pos = edit_state.position;
        self.store
            .set_cell_at(pos.row, pos.col, Some(edit_state.buffer()))?;

        Ok(Some(CellEdit {
            position: pos,
            old_value: edit_state.original,
            new_value: self.store.get(pos.row, pos.col).to_string(),
        }))
    }

    /// Leave edit mode discarding the typed value
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // === Cell writes ===

    /// Clear every cell in the selection rectangle, returning the count
    pub fn clear_selection(&mut self) -> usize {
        if !self.has_cells() {
            return 0;
        }
        let mut cleared = 0;
        for pos in self.selection.range().cells() {
            if self.store.set_cell_at(pos.row, pos.col, None).is_ok() {
                cleared += 1;
            }
        }
        cleared
    }

    /// Write a raw value through the column's coercion rule
    pub fn set_cell(
        &mut self,
        row: usize,
        column_key: &str,
        raw: Option<&str>,
    ) -> Result<(), CellWriteError> {
        self.store.set_cell(row, column_key, raw)
    }

    pub(super) fn store_mut(&mut self) -> &mut GridStore {
        &mut self.store
    }

    // === Rows ===

    /// Append a new unsaved row
    pub fn add_row(&mut self) -> usize {
        let index = self.store.add_row();
        if self.row_count() == 1 {
            self.selection.collapse_to(CellPosition::new(0, 0));
        }
        index
    }

    /// Remove a row locally and keep selection/editing valid
    pub fn remove_local_row(&mut self, index: usize) -> Option<Row> {
        let row = self.store.remove_local(index)?;

        if let Some(edit_row) = self.editing_position().map(|p| p.row) {
            if edit_row == index {
                self.editing = None;
            } else if edit_row > index {
                if let Some(edit) = self.editing.as_mut() {
                    edit.position.row -= 1;
                }
            }
        }

        self.selection.on_row_removed(index, self.row_count());
        Some(row)
    }

    /// Check structural invariants (debug builds)
    ///
    /// Panics with context if the editing cell differs from focus or a
    /// selection corner is out of bounds.
    pub fn assert_invariants_with_context(&self, context: &str) {
        if let Some(pos) = self.editing_position() {
            assert_eq!(
                pos,
                self.focus(),
                "[{}] editing cell must be the focused cell",
                context
            );
        }
        if self.has_cells() {
            let range = self.selection.range();
            assert!(
                self.in_bounds(range.anchor) && self.in_bounds(range.focus),
                "[{}] selection {:?} out of bounds ({}x{})",
                context,
                range,
                self.row_count(),
                self.column_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::schema::{Column, Schema, ValueType};
    use crate::grid::value::CellValue;

    fn make_state(rows: usize) -> GridState {
        let schema = Schema::new(vec![
            Column::new("name", "Name", ValueType::Text),
            Column::new("qty", "Qty", ValueType::Number),
            Column::new(
                "status",
                "Status",
                ValueType::Enum(vec!["Draft".to_string(), "Shipped".to_string()]),
            ),
        ])
        .unwrap();
        let mut state = GridState::new(GridStore::new(schema));
        for _ in 0..rows {
            state.add_row();
        }
        state
    }

    #[test]
    fn test_editing_lifecycle() {
        let mut state = make_state(2);
        state.set_cell(0, "name", Some("a")).unwrap();

        assert!(state.start_editing());
        assert_eq!(state.editing().unwrap().buffer(), "a");

        state.editor_mut().unwrap().insert_char('X');
        let edit = state.commit_edit().unwrap();
        assert!(edit.is_some());
        assert!(!state.is_editing());
        assert_eq!(state.store().get(0, 0), &CellValue::text("aX"));
    }

    #[test]
    fn test_cancel_edit_reverts() {
        let mut state = make_state(1);
        state.set_cell(0, "name", Some("a")).unwrap();

        state.start_editing();
        state.editor_mut().unwrap().insert_char('X');
        state.cancel_edit();

        assert!(!state.is_editing());
        assert_eq!(state.store().get(0, 0), &CellValue::text("a"));
    }

    #[test]
    fn test_start_editing_at_moves_focus() {
        let mut state = make_state(3);
        state.start_editing_at(CellPosition::new(2, 1));

        assert_eq!(state.focus(), CellPosition::new(2, 1));
        assert_eq!(state.editing_position(), Some(CellPosition::new(2, 1)));
        state.assert_invariants_with_context("test");
    }

    #[test]
    fn test_unchanged_commit_writes_nothing() {
        let mut state = make_state(1);
        state.start_editing();
        assert_eq!(state.commit_edit(), Ok(None));
        assert_eq!(state.store().row(0).unwrap().revision(), 0);
    }

    #[test]
    fn test_rejected_commit_leaves_cell() {
        let mut state = make_state(1);
        state.set_cell(0, "status", Some("Draft")).unwrap();
        state.select_cell(CellPosition::new(0, 2));
        state.start_editing_with_char('Z');

        assert!(matches!(
            state.commit_edit(),
            Err(CellWriteError::Rejected(_))
        ));
        assert!(!state.is_editing());
        assert_eq!(state.store().get(0, 2), &CellValue::text("Draft"));
    }

    #[test]
    fn test_remove_row_under_edit_discards_edit() {
        let mut state = make_state(3);
        state.start_editing_at(CellPosition::new(1, 0));
        state.remove_local_row(1);

        assert!(!state.is_editing());
        assert_eq!(state.row_count(), 2);
        state.assert_invariants_with_context("test");
    }

    #[test]
    fn test_remove_last_row_clamps_focus() {
        let mut state = make_state(3);
        state.select_cell(CellPosition::new(2, 1));
        state.remove_local_row(2);
        assert_eq!(state.focus(), CellPosition::new(1, 1));
    }

    #[test]
    fn test_empty_grid_predicates() {
        let state = make_state(0);
        assert!(!state.is_in_range(CellPosition::new(0, 0)));
        assert!(!state.is_focus(CellPosition::new(0, 0)));
    }

    #[test]
    fn test_dragged_rectangle_predicates() {
        let mut state = make_state(4);
        state.begin_selection(CellPosition::new(3, 2));
        assert!(state.extend_selection(CellPosition::new(1, 0)));
        state.end_selection();

        for row in 0..4 {
            for col in 0..3 {
                let pos = CellPosition::new(row, col);
                assert_eq!(state.is_in_range(pos), (1..=3).contains(&row), "{}", pos);
                assert_eq!(
                    state.is_focus(pos),
                    pos == CellPosition::new(1, 0),
                    "{}",
                    pos
                );
            }
        }
        // Out of bounds is never in range
        assert!(!state.is_in_range(CellPosition::new(4, 0)));
        assert!(!state.is_focus(CellPosition::new(1, 7)));
    }
}
