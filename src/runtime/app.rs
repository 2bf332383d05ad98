use std::collections::VecDeque;

use crate::clipboard::{ClipboardBackend, ClipboardError};
use crate::commands::Cmd;
use crate::grid::{
    delete_persisted, CellEditState, GridState, ImportSummary, Row, RowStore, SaveOutcome,
    SelectionRange, SyncError,
};
use crate::keymap::Keystroke;
use crate::messages::{ClipboardMsg, GridMsg, Msg, SyncMsg};
use crate::model::{AppModel, Notice};
use crate::update::update;

/// Owns the model and its collaborators
///
/// `dispatch` runs a message through `update`, executes the returned
/// commands, and keeps going until no follow-up messages remain. Everything
/// happens on the caller's thread; a save completes before `dispatch`
/// returns.
pub struct Runtime<S: RowStore, C: ClipboardBackend> {
    model: AppModel,
    store: S,
    clipboard: C,
    queue: VecDeque<Msg>,
    redraw_requested: bool,
}

impl<S: RowStore, C: ClipboardBackend> Runtime<S, C> {
    pub fn new(model: AppModel, store: S, clipboard: C) -> Self {
        Self {
            model,
            store,
            clipboard,
            queue: VecDeque::new(),
            redraw_requested: false,
        }
    }

    /// Process a message and every follow-up it produces
    pub fn dispatch(&mut self, msg: Msg) {
        self.queue.push_back(msg);
        while let Some(msg) = self.queue.pop_front() {
            if let Some(cmd) = update(&mut self.model, msg) {
                self.process_cmd(cmd);
            }
        }
    }

    pub fn handle_key(&mut self, keystroke: Keystroke) {
        self.dispatch(Msg::Key(keystroke));
    }

    /// Type text as individual keystrokes
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.handle_key(Keystroke::typed(ch));
        }
    }

    /// Save every dirty row and report what happened
    pub fn save(&mut self) -> SaveOutcome {
        self.model.last_save = None;
        self.dispatch(Msg::Sync(SyncMsg::Save));
        self.model.last_save.clone().unwrap_or_default()
    }

    /// Replace the grid contents with the persisted rows
    pub fn load(&mut self) -> Result<usize, SyncError> {
        let result = self.model.grid.load_rows(&mut self.store);
        if let Err(e) = &result {
            self.model.notify_error(e.to_string());
        }
        self.redraw_requested = true;
        result
    }

    /// Append externally parsed rows (CSV import) as new rows
    pub fn import_rows(&mut self, rows: &[Vec<String>]) -> ImportSummary {
        self.dispatch(Msg::Grid(GridMsg::Blur));
        let summary = self.model.grid.import_rows(rows);
        if summary.rejected > 0 {
            self.model
                .notify_error(format!("import: {} cells rejected", summary.rejected));
        }
        if !summary.unmatched_headers.is_empty() {
            self.model.notify_info(format!(
                "import: ignored columns {}",
                summary.unmatched_headers.join(", ")
            ));
        }
        self.redraw_requested = true;
        summary
    }

    /// Remove the row at `index`; persisted rows are deleted remotely first
    pub fn remove_row(&mut self, index: usize) {
        self.dispatch(Msg::Grid(GridMsg::RemoveRow(index)));
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => self.redraw_requested = true,
            Cmd::WriteClipboard(text) => {
                if let Err(e) = self.clipboard.set_text(&text) {
                    self.queue.push_back(Msg::Clipboard(ClipboardMsg::WriteFailed {
                        reason: e.to_string(),
                    }));
                }
            }
            Cmd::ReadClipboard(target) => {
                let msg = match self.clipboard.get_text() {
                    Ok(text) => ClipboardMsg::Received { target, text },
                    Err(ClipboardError::Empty) => ClipboardMsg::Received {
                        target,
                        text: String::new(),
                    },
                    Err(e) => ClipboardMsg::Unavailable {
                        target,
                        reason: e.to_string(),
                    },
                };
                self.queue.push_back(Msg::Clipboard(msg));
            }
            Cmd::PersistRows(batch) => {
                let result = batch.run(&mut self.store);
                self.queue
                    .push_back(Msg::Sync(SyncMsg::SaveCompleted(result)));
            }
            Cmd::DeleteRow { key, id } => {
                let result = delete_persisted(&mut self.store, &id);
                self.queue
                    .push_back(Msg::Sync(SyncMsg::RowDeleted { key, result }));
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    // === Accessors for the UI shell ===

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn grid(&self) -> &GridState {
        &self.model.grid
    }

    pub fn rows(&self) -> &[Row] {
        self.model.grid.store().rows()
    }

    pub fn selection(&self) -> SelectionRange {
        self.model.grid.selection_range()
    }

    pub fn editing(&self) -> Option<&CellEditState> {
        self.model.grid.editing()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.model.notices
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clipboard_backend(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_backend_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    /// Whether anything changed on screen since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}
