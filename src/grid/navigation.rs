//! Cell navigation logic
//!
//! Handles arrow key movement, Shift+Arrow extension, Tab/Shift+Tab and
//! Home/End. Every move lands inside the grid bounds.

use super::model::GridState;
use super::selection::CellPosition;

impl GridState {
    fn offset_focus(&self, delta_row: i32, delta_col: i32) -> CellPosition {
        let focus = self.focus();
        let new_row = (focus.row as i64 + delta_row as i64)
            .max(0)
            .min(self.row_count().saturating_sub(1) as i64) as usize;

        let new_col = (focus.col as i64 + delta_col as i64)
            .max(0)
            .min(self.column_count().saturating_sub(1) as i64) as usize;

        CellPosition::new(new_row, new_col)
    }

    /// Move focus by delta and collapse the selection onto it
    pub fn move_selection(&mut self, delta_row: i32, delta_col: i32) {
        if !self.has_cells() {
            return;
        }
        let target = self.offset_focus(delta_row, delta_col);
        self.select_cell(target);
    }

    /// Move focus by delta keeping the anchor (Shift+Arrow)
    pub fn extend_selection_by(&mut self, delta_row: i32, delta_col: i32) {
        if !self.has_cells() {
            return;
        }
        let target = self.offset_focus(delta_row, delta_col);
        self.set_focus_keep_anchor(target);
    }

    /// Move to next cell (Tab behavior)
    ///
    /// Wraps to the first column of the next row; stays on the last cell.
    pub fn move_to_next_cell(&mut self) {
        let col_count = self.column_count();
        let row_count = self.row_count();

        if col_count == 0 || row_count == 0 {
            return;
        }

        let focus = self.focus();
        let mut new_col = focus.col + 1;
        let mut new_row = focus.row;

        if new_col >= col_count {
            new_col = 0;
            new_row += 1;
            if new_row >= row_count {
                new_row = row_count - 1;
                new_col = col_count - 1;
            }
        }

        self.select_cell(CellPosition::new(new_row, new_col));
    }

    /// Move to previous cell (Shift+Tab behavior)
    pub fn move_to_prev_cell(&mut self) {
        let col_count = self.column_count();
        let row_count = self.row_count();

        if col_count == 0 || row_count == 0 {
            return;
        }

        let mut target = self.focus();
        if target.col > 0 {
            target.col -= 1;
        } else if target.row > 0 {
            target.row -= 1;
            target.col = col_count - 1;
        }

        self.select_cell(target);
    }

    /// Move to first cell (Cmd+Home)
    pub fn move_to_first_cell(&mut self) {
        self.select_cell(CellPosition::new(0, 0));
    }

    /// Move to last cell (Cmd+End)
    pub fn move_to_last_cell(&mut self) {
        let row = self.row_count().saturating_sub(1);
        let col = self.column_count().saturating_sub(1);
        self.select_cell(CellPosition::new(row, col));
    }

    /// Move to first column in current row (Home)
    pub fn move_to_row_start(&mut self) {
        let row = self.focus().row;
        self.select_cell(CellPosition::new(row, 0));
    }

    /// Move to last column in current row (End)
    pub fn move_to_row_end(&mut self) {
        let row = self.focus().row;
        self.select_cell(CellPosition::new(row, self.column_count().saturating_sub(1)));
    }
}
