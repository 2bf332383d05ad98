//! Clipboard update functions
//!
//! Copy and paste go through the system clipboard via commands; results come
//! back as `ClipboardMsg::Received`/`Unavailable`. The in-memory buffer
//! mirrors the last copy so copy/paste keeps working when the system
//! clipboard is denied.

use crate::commands::Cmd;
use crate::grid::{parse_clipboard_text, PasteSummary};
use crate::messages::{ClipboardMsg, PasteTarget};
use crate::model::AppModel;

use super::grid::commit_active_edit;

/// Handle clipboard messages
pub fn update_clipboard(model: &mut AppModel, msg: ClipboardMsg) -> Option<Cmd> {
    match msg {
        ClipboardMsg::Copy => copy(model),
        ClipboardMsg::Paste => {
            commit_active_edit(model);
            if !model.grid.has_cells() {
                return None;
            }
            Some(Cmd::ReadClipboard(PasteTarget::Grid))
        }
        ClipboardMsg::EditPaste => {
            if !model.grid.is_editing() {
                return None;
            }
            Some(Cmd::ReadClipboard(PasteTarget::InlineEditor))
        }
        ClipboardMsg::Received { target, text } => match target {
            PasteTarget::Grid => paste_text(model, &text),
            PasteTarget::InlineEditor => insert_into_editor(model, &text),
        },
        ClipboardMsg::Unavailable { target, reason } => {
            report_denial(model, &reason);
            match target {
                PasteTarget::Grid => {
                    let cells = model.clipboard.cells().to_vec();
                    paste_cells(model, &cells)
                }
                PasteTarget::InlineEditor => {
                    let text = model.clipboard.to_text();
                    insert_into_editor(model, &text)
                }
            }
        }
        ClipboardMsg::WriteFailed { reason } => {
            report_denial(model, &reason);
            None
        }
    }
}

/// Ctrl+C: serialize the selection rectangle and mirror it locally
fn copy(model: &mut AppModel) -> Option<Cmd> {
    let was_editing = commit_active_edit(model);
    if !model.grid.has_cells() {
        return was_editing.then_some(Cmd::Redraw);
    }

    model.clipboard = model.grid.copy_selection();
    let range = model.grid.selection_range();
    tracing::debug!(
        rows = model.clipboard.height(),
        cols = model.clipboard.width(),
        top = range.top_left().row,
        left = range.top_left().col,
        "copied selection"
    );

    let write = Cmd::WriteClipboard(model.clipboard.to_text());
    if was_editing {
        Some(Cmd::batch(vec![Cmd::Redraw, write]))
    } else {
        Some(write)
    }
}

fn paste_text(model: &mut AppModel, text: &str) -> Option<Cmd> {
    // Our own copy round-trips through the buffer to keep the exact cells
    let cells = if !model.clipboard.is_empty() && text == model.clipboard.to_text() {
        model.clipboard.cells().to_vec()
    } else {
        parse_clipboard_text(text)
    };
    paste_cells(model, &cells)
}

fn paste_cells(model: &mut AppModel, cells: &[Vec<String>]) -> Option<Cmd> {
    if cells.is_empty() {
        return None;
    }
    let summary = model.grid.paste_cells(cells);
    report_rejections(model, &summary);
    (summary.written > 0).then_some(Cmd::Redraw)
}

/// One notice per paste, however many cells were rejected
fn report_rejections(model: &mut AppModel, summary: &PasteSummary) {
    let Some(first) = summary.rejected.first() else {
        return;
    };
    let message = match summary.rejected.len() {
        1 => format!("paste: {}", first),
        n => format!("paste: {} cells rejected ({})", n, first),
    };
    model.notify_error(message);
}

fn insert_into_editor(model: &mut AppModel, text: &str) -> Option<Cmd> {
    if text.is_empty() {
        return None;
    }
    let editor = model.grid.editor_mut()?;
    editor.insert_text(text);
    Some(Cmd::Redraw)
}

/// Clipboard denial is reported once per session, not per keystroke
fn report_denial(model: &mut AppModel, reason: &str) {
    if model.clipboard_denial_reported {
        tracing::debug!(reason, "system clipboard still unavailable");
        return;
    }
    model.clipboard_denial_reported = true;
    model.notify_error(format!(
        "system clipboard unavailable ({}); copy and paste stay within this session",
        reason
    ));
}
