//! Rectangular cell selection
//!
//! A selection is an anchor/focus pair. The rectangle spans both corners
//! inclusively, normalized per axis, so a drag in any direction produces the
//! same logical range.

use std::fmt;
use std::ops::RangeInclusive;

/// Position of a cell in the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Clamp into a grid of the given size (both counts must be non-zero)
    pub fn clamped(self, row_count: usize, col_count: usize) -> Self {
        Self {
            row: self.row.min(row_count.saturating_sub(1)),
            col: self.col.min(col_count.saturating_sub(1)),
        }
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Anchor/focus pair describing a rectangle of cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub anchor: CellPosition,
    pub focus: CellPosition,
}

impl SelectionRange {
    /// Single-cell range
    pub fn cell(pos: CellPosition) -> Self {
        Self {
            anchor: pos,
            focus: pos,
        }
    }

    pub fn new(anchor: CellPosition, focus: CellPosition) -> Self {
        Self { anchor, focus }
    }

    pub fn top_left(&self) -> CellPosition {
        CellPosition::new(
            self.anchor.row.min(self.focus.row),
            self.anchor.col.min(self.focus.col),
        )
    }

    pub fn bottom_right(&self) -> CellPosition {
        CellPosition::new(
            self.anchor.row.max(self.focus.row),
            self.anchor.col.max(self.focus.col),
        )
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.top_left().row..=self.bottom_right().row
    }

    pub fn cols(&self) -> RangeInclusive<usize> {
        self.top_left().col..=self.bottom_right().col
    }

    pub fn height(&self) -> usize {
        self.bottom_right().row - self.top_left().row + 1
    }

    pub fn width(&self) -> usize {
        self.bottom_right().col - self.top_left().col + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        self.rows().contains(&pos.row) && self.cols().contains(&pos.col)
    }

    /// All positions in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellPosition> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |r| cols.clone().map(move |c| CellPosition::new(r, c)))
    }
}

/// Selection state: the current range plus whether a drag is in progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    range: SelectionRange,
    selecting: bool,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(&self) -> SelectionRange {
        self.range
    }

    pub fn focus(&self) -> CellPosition {
        self.range.focus
    }

    pub fn anchor(&self) -> CellPosition {
        self.range.anchor
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Start a drag selection at `pos`
    pub fn begin(&mut self, pos: CellPosition) {
        self.range = SelectionRange::cell(pos);
        self.selecting = true;
    }

    /// Move the focus corner while a drag is in progress
    ///
    /// Returns false (and does nothing) when no drag is active.
    pub fn extend(&mut self, pos: CellPosition) -> bool {
        if !self.selecting {
            return false;
        }
        self.range.focus = pos;
        true
    }

    /// Finish the drag; the range stays as the current selection
    pub fn end(&mut self) {
        self.selecting = false;
    }

    /// Collapse to a single cell (keyboard navigation)
    pub fn collapse_to(&mut self, pos: CellPosition) {
        self.range = SelectionRange::cell(pos);
        self.selecting = false;
    }

    /// Move only the focus corner, keeping the anchor (Shift+Arrow)
    pub fn set_focus(&mut self, pos: CellPosition) {
        self.range.focus = pos;
    }

    pub fn is_in_range(&self, pos: CellPosition) -> bool {
        self.range.contains(pos)
    }

    pub fn is_focus(&self, pos: CellPosition) -> bool {
        self.range.focus == pos
    }

    /// Adjust corners after `removed_row` was deleted from a grid that now
    /// has `row_count` rows
    ///
    /// Corners below the removed row follow their row up by one; corners on
    /// the removed row clamp to the nearest remaining row.
    pub fn on_row_removed(&mut self, removed_row: usize, row_count: usize) {
        let last = row_count.saturating_sub(1);
        let adjust = |pos: &mut CellPosition| {
            if pos.row > removed_row {
                pos.row -= 1;
            }
            pos.row = pos.row.min(last);
        };
        adjust(&mut self.range.anchor);
        adjust(&mut self.range.focus);
    }

    /// Clamp both corners into the grid bounds
    pub fn clamp(&mut self, row_count: usize, col_count: usize) {
        self.range.anchor = self.range.anchor.clamped(row_count, col_count);
        self.range.focus = self.range.focus.clamped(row_count, col_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> CellPosition {
        CellPosition::new(row, col)
    }

    #[test]
    fn test_range_normalized_in_all_directions() {
        let expected = (pos(1, 1), pos(3, 4));
        let drags = [
            (pos(1, 1), pos(3, 4)),
            (pos(3, 4), pos(1, 1)),
            (pos(1, 4), pos(3, 1)),
            (pos(3, 1), pos(1, 4)),
        ];

        for (anchor, focus) in drags {
            let range = SelectionRange::new(anchor, focus);
            assert_eq!((range.top_left(), range.bottom_right()), expected);
            assert_eq!(range.height(), 3);
            assert_eq!(range.width(), 4);
        }
    }

    #[test]
    fn test_range_cells_row_major() {
        let range = SelectionRange::new(pos(1, 2), pos(0, 1));
        let cells: Vec<_> = range.cells().collect();
        assert_eq!(cells, vec![pos(0, 1), pos(0, 2), pos(1, 1), pos(1, 2)]);
    }

    #[test]
    fn test_begin_extend_end() {
        let mut sel = SelectionModel::new();
        sel.begin(pos(2, 2));
        assert!(sel.is_selecting());
        assert!(sel.range().is_single_cell());

        assert!(sel.extend(pos(0, 3)));
        assert_eq!(sel.anchor(), pos(2, 2));
        assert_eq!(sel.focus(), pos(0, 3));

        sel.end();
        assert!(!sel.is_selecting());
        assert!(!sel.extend(pos(5, 5)));
        assert_eq!(sel.focus(), pos(0, 3));
        assert!(sel.is_in_range(pos(1, 2)));
        assert!(!sel.is_in_range(pos(1, 1)));
        assert!(sel.is_focus(pos(0, 3)));
    }

    #[test]
    fn test_row_removed_shifts_and_clamps() {
        let mut sel = SelectionModel::new();
        sel.begin(pos(1, 0));
        sel.extend(pos(4, 1));
        sel.end();

        // 5 rows -> remove row 2 -> 4 rows
        sel.on_row_removed(2, 4);
        assert_eq!(sel.anchor(), pos(1, 0));
        assert_eq!(sel.focus(), pos(3, 1));

        // remove last row while focus is on it
        sel.on_row_removed(3, 3);
        assert_eq!(sel.focus(), pos(2, 1));
    }
}
