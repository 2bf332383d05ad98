//! Default keybindings for the grid
//!
//! The standard bindings ship embedded from keymap.yaml at the project root,
//! with a hardcoded table as fallback.

use std::path::Path;

use super::binding::Keybinding;
use super::command::Command;
use super::config::{load_keymap_file, parse_keymap_yaml};
use super::context::Condition;
use super::types::{KeyCode, Keystroke, Modifiers};

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// The embedded default keymap source
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: embedded defaults + user overrides
///
/// User bindings come from `keymap.yaml` in the config directory.
pub fn load_default_keymap() -> Vec<Keybinding> {
    let user_path = crate::config_paths::keymap_file();
    load_keymap_with_overrides(user_path.as_deref())
}

/// Load the embedded defaults and merge `user_path` over them if it exists
///
/// User bindings with `command: Unbound` remove matching default bindings.
pub fn load_keymap_with_overrides(user_path: Option<&Path>) -> Vec<Keybinding> {
    let mut bindings = match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(b) => {
            tracing::debug!("Loaded embedded default keymap ({} bindings)", b.len());
            b
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            default_bindings()
        }
    };

    if let Some(user_path) = user_path {
        if user_path.exists() {
            match load_keymap_file(user_path) {
                Ok(user_bindings) => {
                    tracing::info!(
                        "Merging user keymap from {} ({} bindings)",
                        user_path.display(),
                        user_bindings.len()
                    );
                    bindings = merge_bindings(bindings, user_bindings);
                }
                Err(e) => {
                    tracing::warn!("Failed to load user keymap from {}: {}", user_path.display(), e);
                }
            }
        }
    }

    bindings
}

/// Merge user bindings into base bindings
///
/// - Same keystroke and conditions: the user binding replaces the base one
/// - `Unbound`: removes every base binding for that keystroke
/// - Otherwise the user binding is added
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        if user_binding.command == Command::Unbound {
            result.retain(|b| b.keystroke != user_binding.keystroke);
            continue;
        }

        let existing_idx = result
            .iter()
            .position(|b| b.keystroke == user_binding.keystroke && b.when == user_binding.when);

        if let Some(idx) = existing_idx {
            result[idx] = user_binding;
        } else {
            result.push(user_binding);
        }
    }

    result
}

/// Hardcoded default keybindings for the current platform
///
/// Mirrors keymap.yaml. Uses Cmd on macOS, Ctrl on Windows/Linux for the
/// "command" modifier.
pub fn default_bindings() -> Vec<Keybinding> {
    use Condition::{Editing, Navigating};

    let cmd = Modifiers::cmd();
    let cmd_shift = cmd | Modifiers::SHIFT;
    let shift = Modifiers::SHIFT;
    let none = Modifiers::NONE;

    vec![
        // Navigation
        bind(KeyCode::Up, none, Command::MoveUp).when_single(Navigating),
        bind(KeyCode::Down, none, Command::MoveDown).when_single(Navigating),
        bind(KeyCode::Left, none, Command::MoveLeft).when_single(Navigating),
        bind(KeyCode::Right, none, Command::MoveRight).when_single(Navigating),
        bind(KeyCode::Home, none, Command::RowStart).when_single(Navigating),
        bind(KeyCode::End, none, Command::RowEnd).when_single(Navigating),
        bind(KeyCode::Home, cmd, Command::FirstCell),
        bind(KeyCode::End, cmd, Command::LastCell),
        bind(KeyCode::Tab, none, Command::NextCell),
        bind(KeyCode::Tab, shift, Command::PrevCell),

        // Selection
        bind(KeyCode::Up, shift, Command::ExtendUp).when_single(Navigating),
        bind(KeyCode::Down, shift, Command::ExtendDown).when_single(Navigating),
        bind(KeyCode::Left, shift, Command::ExtendLeft).when_single(Navigating),
        bind(KeyCode::Right, shift, Command::ExtendRight).when_single(Navigating),
        bind(KeyCode::Delete, none, Command::ClearCells).when_single(Navigating),
        bind(KeyCode::Backspace, none, Command::ClearCells).when_single(Navigating),

        // Editing
        bind(KeyCode::Enter, none, Command::StartEditing).when_single(Navigating),
        bind(KeyCode::Enter, none, Command::ConfirmEdit).when_single(Editing),
        bind(KeyCode::F(2), none, Command::StartEditing),
        bind(KeyCode::Escape, none, Command::CancelEdit).when_single(Editing),
        bind(KeyCode::Left, none, Command::EditCursorLeft).when_single(Editing),
        bind(KeyCode::Right, none, Command::EditCursorRight).when_single(Editing),
        bind(KeyCode::Home, none, Command::EditCursorHome).when_single(Editing),
        bind(KeyCode::End, none, Command::EditCursorEnd).when_single(Editing),
        bind(KeyCode::Backspace, none, Command::EditDeleteBackward).when_single(Editing),
        bind(KeyCode::Delete, none, Command::EditDeleteForward).when_single(Editing),
        bind(KeyCode::Up, none, Command::Consume).when_single(Editing),
        bind(KeyCode::Down, none, Command::Consume).when_single(Editing),
        bind(KeyCode::Up, shift, Command::Consume).when_single(Editing),
        bind(KeyCode::Down, shift, Command::Consume).when_single(Editing),
        bind(KeyCode::Left, shift, Command::Consume).when_single(Editing),
        bind(KeyCode::Right, shift, Command::Consume).when_single(Editing),

        // Clipboard
        bind(KeyCode::Char('c'), cmd, Command::Copy),
        bind(KeyCode::Char('v'), cmd, Command::Paste).when_single(Navigating),
        bind(KeyCode::Char('v'), cmd, Command::EditPaste).when_single(Editing),

        // Rows and persistence
        bind(KeyCode::Char('n'), cmd_shift, Command::AddRow),
        bind(KeyCode::Backspace, cmd_shift, Command::RemoveRow),
        bind(KeyCode::Char('s'), cmd, Command::Save),
    ]
}

fn bind(key: KeyCode, mods: Modifiers, command: Command) -> Keybinding {
    Keybinding::new(Keystroke::new(key, mods), command)
}
