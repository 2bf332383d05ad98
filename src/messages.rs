//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::grid::{RowKey, SaveResult, SyncError};
use crate::keymap::Keystroke;

/// Direction for focus movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, column) delta for one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Grid messages (navigation, selection, inline editing, rows)
#[derive(Debug, Clone, PartialEq)]
pub enum GridMsg {
    // === Navigation ===
    /// Move focus one cell, collapsing the selection (Arrow)
    Move(Direction),
    /// Move focus one cell keeping the anchor (Shift+Arrow)
    Extend(Direction),
    /// Tab
    NextCell,
    /// Shift+Tab
    PrevCell,
    /// Home
    RowStart,
    /// End
    RowEnd,
    /// Ctrl+Home
    FirstCell,
    /// Ctrl+End
    LastCell,

    // === Mouse ===
    MouseDown { row: usize, col: usize },
    MouseDrag { row: usize, col: usize },
    MouseUp,
    DoubleClick { row: usize, col: usize },

    // === Editing ===
    /// Enter/F2 on the focused cell
    StartEditing,
    /// Printable key while navigating: edit with the char replacing the value
    StartEditingWithChar(char),
    /// Enter while editing: commit and move down
    ConfirmEdit,
    /// Escape while editing: discard
    CancelEdit,
    /// Focus left the inline input: implicit commit
    Blur,
    EditInsertChar(char),
    EditInsertText(String),
    EditDeleteBackward,
    EditDeleteForward,
    EditCursorLeft,
    EditCursorRight,
    EditCursorHome,
    EditCursorEnd,

    // === Cells and rows ===
    /// Delete/Backspace: clear every cell in the selection rectangle
    ClearSelection,
    AddRow,
    RemoveRow(usize),
    RemoveFocusedRow,
}

/// Where clipboard text read by the runtime should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteTarget {
    /// Paste a rectangle at the focus
    Grid,
    /// Insert into the inline editor buffer
    InlineEditor,
}

/// Clipboard messages
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardMsg {
    Copy,
    Paste,
    /// Paste into the inline editor
    EditPaste,
    /// System clipboard text arrived
    Received { target: PasteTarget, text: String },
    /// System clipboard could not be read
    Unavailable { target: PasteTarget, reason: String },
    /// System clipboard could not be written
    WriteFailed { reason: String },
}

/// Persistence messages
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMsg {
    /// Save all dirty rows
    Save,
    /// Batch finished (sync result)
    SaveCompleted(SaveResult),
    /// Remote delete of a persisted row finished
    RowDeleted {
        key: RowKey,
        result: Result<(), SyncError>,
    },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Raw keystroke, resolved through the keymap
    Key(Keystroke),
    Grid(GridMsg),
    Clipboard(ClipboardMsg),
    Sync(SyncMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn key(keystroke: Keystroke) -> Self {
        Msg::Key(keystroke)
    }

    pub fn move_focus(direction: Direction) -> Self {
        Msg::Grid(GridMsg::Move(direction))
    }

    pub fn mouse_down(row: usize, col: usize) -> Self {
        Msg::Grid(GridMsg::MouseDown { row, col })
    }
}
