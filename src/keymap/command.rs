//! Command enum representing all executable grid actions
//!
//! Commands are the bridge between keybindings and the message system.
//! Each command maps to zero or more `Msg` values for the Elm-style update loop.

use std::str::FromStr;

use crate::messages::{ClipboardMsg, Direction, GridMsg, Msg, SyncMsg};

/// All grid commands that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ========================================================================
    // Navigation (collapses the selection)
    // ========================================================================
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Tab: next cell, wrapping to the next row
    NextCell,
    /// Shift+Tab
    PrevCell,
    RowStart,
    RowEnd,
    FirstCell,
    LastCell,

    // ========================================================================
    // Selection
    // ========================================================================
    ExtendUp,
    ExtendDown,
    ExtendLeft,
    ExtendRight,
    /// Clear every cell in the selection rectangle
    ClearCells,

    // ========================================================================
    // Editing
    // ========================================================================
    StartEditing,
    /// Commit the inline edit and move down one row
    ConfirmEdit,
    /// Discard the inline edit
    CancelEdit,
    EditDeleteBackward,
    EditDeleteForward,
    EditCursorLeft,
    EditCursorRight,
    EditCursorHome,
    EditCursorEnd,

    // ========================================================================
    // Clipboard
    // ========================================================================
    Copy,
    Paste,
    /// Paste clipboard text into the inline editor
    EditPaste,

    // ========================================================================
    // Rows and persistence
    // ========================================================================
    AddRow,
    RemoveRow,
    Save,

    // ========================================================================
    // Special
    // ========================================================================
    /// Swallow the keystroke without doing anything
    Consume,
    /// Removes a default binding when used in a user keymap
    Unbound,
}

impl Command {
    /// Convert this command to message(s) for the Elm update loop
    pub fn to_msgs(self) -> Vec<Msg> {
        use Command::*;

        let grid = |msg: GridMsg| vec![Msg::Grid(msg)];

        match self {
            MoveUp => grid(GridMsg::Move(Direction::Up)),
            MoveDown => grid(GridMsg::Move(Direction::Down)),
            MoveLeft => grid(GridMsg::Move(Direction::Left)),
            MoveRight => grid(GridMsg::Move(Direction::Right)),
            NextCell => grid(GridMsg::NextCell),
            PrevCell => grid(GridMsg::PrevCell),
            RowStart => grid(GridMsg::RowStart),
            RowEnd => grid(GridMsg::RowEnd),
            FirstCell => grid(GridMsg::FirstCell),
            LastCell => grid(GridMsg::LastCell),

            ExtendUp => grid(GridMsg::Extend(Direction::Up)),
            ExtendDown => grid(GridMsg::Extend(Direction::Down)),
            ExtendLeft => grid(GridMsg::Extend(Direction::Left)),
            ExtendRight => grid(GridMsg::Extend(Direction::Right)),
            ClearCells => grid(GridMsg::ClearSelection),

            StartEditing => grid(GridMsg::StartEditing),
            ConfirmEdit => grid(GridMsg::ConfirmEdit),
            CancelEdit => grid(GridMsg::CancelEdit),
            EditDeleteBackward => grid(GridMsg::EditDeleteBackward),
            EditDeleteForward => grid(GridMsg::EditDeleteForward),
            EditCursorLeft => grid(GridMsg::EditCursorLeft),
            EditCursorRight => grid(GridMsg::EditCursorRight),
            EditCursorHome => grid(GridMsg::EditCursorHome),
            EditCursorEnd => grid(GridMsg::EditCursorEnd),

            Copy => vec![Msg::Clipboard(ClipboardMsg::Copy)],
            Paste => vec![Msg::Clipboard(ClipboardMsg::Paste)],
            EditPaste => vec![Msg::Clipboard(ClipboardMsg::EditPaste)],

            AddRow => grid(GridMsg::AddRow),
            RemoveRow => grid(GridMsg::RemoveFocusedRow),
            Save => vec![Msg::Sync(SyncMsg::Save)],

            Consume | Unbound => vec![],
        }
    }

    /// Human-readable name for help output
    pub fn display_name(self) -> &'static str {
        use Command::*;

        match self {
            MoveUp => "Move Up",
            MoveDown => "Move Down",
            MoveLeft => "Move Left",
            MoveRight => "Move Right",
            NextCell => "Next Cell",
            PrevCell => "Previous Cell",
            RowStart => "Row Start",
            RowEnd => "Row End",
            FirstCell => "First Cell",
            LastCell => "Last Cell",
            ExtendUp => "Extend Selection Up",
            ExtendDown => "Extend Selection Down",
            ExtendLeft => "Extend Selection Left",
            ExtendRight => "Extend Selection Right",
            ClearCells => "Clear Cells",
            StartEditing => "Edit Cell",
            ConfirmEdit => "Confirm Edit",
            CancelEdit => "Cancel Edit",
            EditDeleteBackward => "Delete Backward",
            EditDeleteForward => "Delete Forward",
            EditCursorLeft => "Cursor Left",
            EditCursorRight => "Cursor Right",
            EditCursorHome => "Cursor Home",
            EditCursorEnd => "Cursor End",
            Copy => "Copy",
            Paste => "Paste",
            EditPaste => "Paste Into Cell",
            AddRow => "Add Row",
            RemoveRow => "Remove Row",
            Save => "Save",
            Consume => "Ignore Key",
            Unbound => "Unbound",
        }
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Command::*;

        match s {
            "MoveUp" => Ok(MoveUp),
            "MoveDown" => Ok(MoveDown),
            "MoveLeft" => Ok(MoveLeft),
            "MoveRight" => Ok(MoveRight),
            "NextCell" => Ok(NextCell),
            "PrevCell" => Ok(PrevCell),
            "RowStart" => Ok(RowStart),
            "RowEnd" => Ok(RowEnd),
            "FirstCell" => Ok(FirstCell),
            "LastCell" => Ok(LastCell),

            "ExtendUp" => Ok(ExtendUp),
            "ExtendDown" => Ok(ExtendDown),
            "ExtendLeft" => Ok(ExtendLeft),
            "ExtendRight" => Ok(ExtendRight),
            "ClearCells" => Ok(ClearCells),

            "StartEditing" => Ok(StartEditing),
            "ConfirmEdit" => Ok(ConfirmEdit),
            "CancelEdit" => Ok(CancelEdit),
            "EditDeleteBackward" => Ok(EditDeleteBackward),
            "EditDeleteForward" => Ok(EditDeleteForward),
            "EditCursorLeft" => Ok(EditCursorLeft),
            "EditCursorRight" => Ok(EditCursorRight),
            "EditCursorHome" => Ok(EditCursorHome),
            "EditCursorEnd" => Ok(EditCursorEnd),

            "Copy" => Ok(Copy),
            "Paste" => Ok(Paste),
            "EditPaste" => Ok(EditPaste),

            "AddRow" => Ok(AddRow),
            "RemoveRow" => Ok(RemoveRow),
            "Save" => Ok(Save),

            "Consume" => Ok(Consume),
            "Unbound" => Ok(Unbound),

            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_to_msgs_movement() {
        let msgs = Command::MoveUp.to_msgs();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(msgs[0], Msg::Grid(GridMsg::Move(Direction::Up))));
    }

    #[test]
    fn test_command_to_msgs_save() {
        let msgs = Command::Save.to_msgs();
        assert!(matches!(msgs[0], Msg::Sync(SyncMsg::Save)));
    }

    #[test]
    fn test_consume_and_unbound_are_empty() {
        assert!(Command::Consume.to_msgs().is_empty());
        assert!(Command::Unbound.to_msgs().is_empty());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Command::from_str("NextCell"), Ok(Command::NextCell));
        assert_eq!(Command::from_str("EditPaste"), Ok(Command::EditPaste));
        assert_eq!(Command::from_str("Undo"), Err(()));
    }
}
