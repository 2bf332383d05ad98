//! Inline cell editor state
//!
//! While a cell is being edited, keystrokes go to this single-line buffer
//! instead of the grid. Nothing reaches the store until the edit is committed.

use super::selection::CellPosition;

/// State for editing a single cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEditState {
    /// Position of the cell being edited
    pub position: CellPosition,
    /// Current input text
    buffer: String,
    /// Cursor position in characters
    cursor: usize,
    /// Value when edit mode was entered (restored on cancel)
    pub original: String,
}

impl CellEditState {
    /// Create new edit state for a cell, cursor at the end
    pub fn new(position: CellPosition, value: String) -> Self {
        let cursor = value.chars().count();
        Self {
            position,
            buffer: value.clone(),
            cursor,
            original: value,
        }
    }

    /// Create new edit state starting with a character (replaces content)
    pub fn with_char(position: CellPosition, original: String, ch: char) -> Self {
        Self {
            position,
            buffer: ch.to_string(),
            cursor: 1,
            original,
        }
    }

    /// Get the current buffer content
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Check if content changed from original
    pub fn is_modified(&self) -> bool {
        self.buffer != self.original
    }

    /// Cursor position in characters (for rendering)
    pub fn cursor_char_position(&self) -> usize {
        self.cursor
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert text at cursor (for paste); line breaks are dropped
    pub fn insert_text(&mut self, text: &str) {
        for ch in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(ch);
        }
    }

    /// Delete character before cursor (backspace)
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.buffer.remove(at);
        self.cursor -= 1;
    }

    /// Delete character at cursor (delete)
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }
}

/// Represents a committed cell edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub position: CellPosition,
    pub old_value: String,
    pub new_value: String,
}
