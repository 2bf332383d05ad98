//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! `update` never touches the clipboard or the row store itself; the runtime
//! executes these and feeds the results back as messages.

use crate::grid::{RowKey, SaveBatch};
use crate::messages::PasteTarget;

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Grid state changed and should be re-rendered
    Redraw,
    /// Push text to the system clipboard
    WriteClipboard(String),
    /// Read the system clipboard, answering with `ClipboardMsg::Received`
    /// or `ClipboardMsg::Unavailable`
    ReadClipboard(PasteTarget),
    /// Run a save batch, answering with `SyncMsg::SaveCompleted`
    PersistRows(SaveBatch),
    /// Delete a persisted row remotely, answering with `SyncMsg::RowDeleted`
    DeleteRow { key: RowKey, id: String },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // Clipboard writes don't change what is on screen
            Cmd::WriteClipboard(_) => false,
            // Async results trigger their own redraw when they arrive
            Cmd::ReadClipboard(_) => false,
            Cmd::PersistRows(_) => false,
            Cmd::DeleteRow { .. } => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            cmd => vec![cmd],
        }
    }
}
