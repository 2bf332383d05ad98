//! Clipboard codec: rectangle ↔ tab/newline-delimited text
//!
//! Copy produces the standard spreadsheet interchange form (tab between
//! columns, newline between rows). Paste anchors the parsed rectangle at the
//! focus, coerces each cell through the target column, and skips cells that
//! fall outside the grid.

use super::model::GridState;
use super::schema::CoercionError;
use super::selection::{CellPosition, SelectionRange};
use super::store::{CellWriteError, GridStore};

/// Last locally copied rectangle, row-major
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardBuffer {
    cells: Vec<Vec<String>>,
}

impl ClipboardBuffer {
    pub fn new(cells: Vec<Vec<String>>) -> Self {
        Self { cells }
    }

    /// Parse clipboard text into a buffer
    pub fn from_text(text: &str) -> Self {
        Self {
            cells: parse_clipboard_text(text),
        }
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Text form pushed to the system clipboard
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Keep a cell on one line of the interchange format
fn sanitize_cell(value: &str) -> String {
    if value.contains(['\t', '\n', '\r']) {
        value.replace(['\t', '\n', '\r'], " ")
    } else {
        value.to_string()
    }
}

/// Stringify every cell of `range` in row-major, column-schema order
pub fn serialize_range(store: &GridStore, range: SelectionRange) -> ClipboardBuffer {
    let cells = range
        .rows()
        .map(|row| {
            range
                .cols()
                .map(|col| sanitize_cell(&store.get(row, col).to_string()))
                .collect()
        })
        .collect();
    ClipboardBuffer { cells }
}

/// Split clipboard text into rows (LF or CRLF) and columns (tab)
///
/// A single trailing line break, as appended by most spreadsheet
/// applications, does not produce an extra row.
pub fn parse_clipboard_text(text: &str) -> Vec<Vec<String>> {
    if text.is_empty() {
        return Vec::new();
    }

    let body = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);

    body.split('\n')
        .map(|line| {
            line.strip_suffix('\r')
                .unwrap_or(line)
                .split('\t')
                .map(|s| s.to_string())
                .collect()
        })
        .collect()
}

/// Result of applying a paste
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteSummary {
    /// Cells written
    pub written: usize,
    /// Cells outside the grid bounds
    pub skipped: usize,
    /// Cells rejected by their target column (enum options)
    pub rejected: Vec<CoercionError>,
}

impl GridState {
    /// Serialize the current selection rectangle
    pub fn copy_selection(&self) -> ClipboardBuffer {
        if !self.has_cells() {
            return ClipboardBuffer::default();
        }
        serialize_range(self.store(), self.selection_range())
    }

    /// Write a rectangle of raw strings with its top-left at the focus
    ///
    /// Cells past the last row or column are skipped; the grid never grows.
    /// A failing cell never aborts the rest of the paste.
    pub fn paste_cells(&mut self, cells: &[Vec<String>]) -> PasteSummary {
        let mut summary = PasteSummary::default();
        if !self.has_cells() {
            summary.skipped = cells.iter().map(|r| r.len()).sum();
            return summary;
        }

        let origin = self.focus();
        let row_count = self.row_count();
        let col_count = self.column_count();

        for (r, source_row) in cells.iter().enumerate() {
            for (c, raw) in source_row.iter().enumerate() {
                let target = CellPosition::new(origin.row + r, origin.col + c);
                if target.row >= row_count || target.col >= col_count {
                    summary.skipped += 1;
                    continue;
                }

                match self
                    .store_mut()
                    .set_cell_at(target.row, target.col, Some(raw))
                {
                    Ok(()) => summary.written += 1,
                    Err(CellWriteError::Rejected(e)) => summary.rejected.push(e),
                    Err(e) => {
                        tracing::warn!(%e, row = target.row, col = target.col, "paste write failed");
                        summary.skipped += 1;
                    }
                }
            }
        }

        tracing::debug!(
            written = summary.written,
            skipped = summary.skipped,
            rejected = summary.rejected.len(),
            "paste applied"
        );
        summary
    }
}
