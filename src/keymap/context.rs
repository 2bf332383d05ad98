//! Context system for conditional keybindings
//!
//! The inline editor owns raw keystrokes while a cell is being edited, so
//! most grid keys resolve differently depending on the editing mode.

use serde::Deserialize;

/// Context extracted from the application model for keybinding evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Whether a cell is under inline edit
    pub editing: bool,
}

impl KeyContext {
    pub fn navigating() -> Self {
        Self { editing: false }
    }

    pub fn editing() -> Self {
        Self { editing: true }
    }
}

/// Conditions that can be attached to keybindings
///
/// Multiple conditions on a binding are ANDed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Binding only active while a cell is being edited
    Editing,
    /// Binding only active while no cell is being edited
    Navigating,
}

impl Condition {
    /// Evaluate this condition against the current context
    pub fn evaluate(self, ctx: &KeyContext) -> bool {
        match self {
            Condition::Editing => ctx.editing,
            Condition::Navigating => !ctx.editing,
        }
    }

    /// Evaluate all conditions (AND logic)
    pub fn evaluate_all(conditions: &[Condition], ctx: &KeyContext) -> bool {
        conditions.iter().all(|c| c.evaluate(ctx))
    }
}
