//! Application model - the complete state of the order grid
//!
//! Follows the Elm Architecture pattern: `update` is the only code that
//! mutates an `AppModel`.

pub mod notice;

pub use notice::{Notice, NoticeLevel};

use crate::grid::{ClipboardBuffer, GridState, SaveOutcome};
use crate::keymap::{KeyContext, Keymap};

/// Complete application state
#[derive(Debug, Clone)]
pub struct AppModel {
    /// Rows, selection and inline editor
    pub grid: GridState,
    pub keymap: Keymap,
    /// In-memory mirror of the last copy, used when the system clipboard
    /// is unavailable
    pub clipboard: ClipboardBuffer,
    /// User-facing notices, oldest first
    pub notices: Vec<Notice>,
    /// Clipboard denial is reported once per session
    pub clipboard_denial_reported: bool,
    /// Outcome of the most recent save
    pub last_save: Option<SaveOutcome>,
}

impl AppModel {
    pub fn new(grid: GridState, keymap: Keymap) -> Self {
        Self {
            grid,
            keymap,
            clipboard: ClipboardBuffer::default(),
            notices: Vec::new(),
            clipboard_denial_reported: false,
            last_save: None,
        }
    }

    /// Context used to resolve conditional keybindings
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            editing: self.grid.is_editing(),
        }
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.push_notice(Notice::info(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.push_notice(Notice::error(message));
    }

    fn push_notice(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Error => tracing::warn!("{}", notice.message),
        }
        self.notices.push(notice);
    }

    /// Take all pending notices
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Errors among the pending notices
    pub fn error_notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
    }
}
