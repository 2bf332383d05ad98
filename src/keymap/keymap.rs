//! Keymap struct for storing and looking up keybindings

use std::collections::HashMap;

use super::binding::Keybinding;
use super::command::Command;
use super::context::{Condition, KeyContext};
use super::types::Keystroke;

/// The keymap stores all keybindings and handles lookup
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Keybinding>,
    /// Indices into `bindings`; several bindings can share a keystroke
    /// with different conditions
    lookup: HashMap<Keystroke, Vec<usize>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keymap with the given bindings
    pub fn with_bindings(bindings: Vec<Keybinding>) -> Self {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn add_binding(&mut self, binding: Keybinding) {
        let idx = self.bindings.len();
        self.lookup.entry(binding.keystroke).or_default().push(idx);
        self.bindings.push(binding);
    }

    /// Look up a keystroke with context
    ///
    /// Bindings with conditions that match are preferred over
    /// unconditional ones; within each group the first binding wins.
    pub fn lookup_with_context(
        &self,
        keystroke: &Keystroke,
        context: Option<&KeyContext>,
    ) -> Option<Command> {
        let indices = self.lookup.get(keystroke)?;

        if let Some(ctx) = context {
            for &idx in indices {
                let binding = &self.bindings[idx];
                if let Some(ref conditions) = binding.when {
                    if Condition::evaluate_all(conditions, ctx) {
                        return Some(binding.command);
                    }
                }
            }
        }

        indices
            .iter()
            .map(|&idx| &self.bindings[idx])
            .find(|b| b.when.is_none())
            .map(|b| b.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCode, Modifiers};

    fn ctrl_s() -> Keystroke {
        Keystroke::new(KeyCode::Char('s'), Modifiers::CTRL)
    }

    fn enter() -> Keystroke {
        Keystroke::key(KeyCode::Enter)
    }

    #[test]
    fn test_single_binding_lookup() {
        let keymap = Keymap::with_bindings(vec![Keybinding::new(ctrl_s(), Command::Save)]);

        assert_eq!(keymap.lookup_with_context(&ctrl_s(), None), Some(Command::Save));
        assert_eq!(keymap.lookup_with_context(&enter(), None), None);
    }

    #[test]
    fn test_conditional_binding_wins() {
        let keymap = Keymap::with_bindings(vec![
            Keybinding::new(enter(), Command::StartEditing),
            Keybinding::new(enter(), Command::ConfirmEdit).when_single(Condition::Editing),
        ]);

        assert_eq!(
            keymap.lookup_with_context(&enter(), Some(&KeyContext::editing())),
            Some(Command::ConfirmEdit)
        );
        assert_eq!(
            keymap.lookup_with_context(&enter(), Some(&KeyContext::navigating())),
            Some(Command::StartEditing)
        );
        assert_eq!(keymap.lookup_with_context(&enter(), None), Some(Command::StartEditing));
    }

    #[test]
    fn test_conditional_only_binding_needs_context() {
        let keymap = Keymap::with_bindings(vec![
            Keybinding::new(enter(), Command::ConfirmEdit).when_single(Condition::Editing)
        ]);

        assert_eq!(keymap.lookup_with_context(&enter(), None), None);
        assert_eq!(
            keymap.lookup_with_context(&enter(), Some(&KeyContext::navigating())),
            None
        );
    }
}
