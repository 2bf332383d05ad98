//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. None of them
//! perform I/O; side effects are returned as [`Cmd`]s.

mod clipboard;
mod grid;
mod sync;

use crate::commands::Cmd;
use crate::keymap::Keystroke;
use crate::messages::{GridMsg, Msg};
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use clipboard::update_clipboard;
pub use grid::update_grid;
pub use sync::update_sync;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation and checks the
/// grid invariants after every message.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Key(keystroke) => update_key(model, keystroke),
        Msg::Grid(m) => grid::update_grid(model, m),
        Msg::Clipboard(m) => clipboard::update_clipboard(model, m),
        Msg::Sync(m) => sync::update_sync(model, m),
    }
}

/// Resolve a keystroke through the keymap
///
/// Unbound printable keys type into the grid: while navigating they start
/// an edit replacing the cell value, while editing they insert at the cursor.
fn update_key(model: &mut AppModel, keystroke: Keystroke) -> Option<Cmd> {
    let context = model.key_context();

    if let Some(command) = model.keymap.lookup_with_context(&keystroke, Some(&context)) {
        tracing::trace!(target: "keymap", %keystroke, ?command, "resolved");
        let cmds = command
            .to_msgs()
            .into_iter()
            .filter_map(|m| update_inner(model, m))
            .collect();
        return combine(cmds);
    }

    let ch = keystroke.printable_char()?;
    let msg = if context.editing {
        GridMsg::EditInsertChar(ch)
    } else {
        GridMsg::StartEditingWithChar(ch)
    };
    grid::update_grid(model, msg)
}

/// Merge commands from several messages into one
fn combine(mut cmds: Vec<Cmd>) -> Option<Cmd> {
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(Cmd::batch(cmds)),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after selection state, logs the diff, and asserts that
/// selection corners are in bounds and the edited cell is the focused cell.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = SelectionSnapshot::from_grid(&model.grid);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = SelectionSnapshot::from_grid(&model.grid);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "selection", %diff, "state changed");
    }

    model.grid.assert_invariants_with_context(&msg_name);

    result
}

/// Get a display name for a message
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Grid::Move(Up)`
/// - `Key::Ctrl+C`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Key(k) => format!("Key::{}", k),
        Msg::Grid(m) => format!("Grid::{:?}", m),
        Msg::Clipboard(m) => format!("Clipboard::{:?}", m),
        Msg::Sync(m) => format!("Sync::{:?}", m),
    }
}
