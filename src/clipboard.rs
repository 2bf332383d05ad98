//! System clipboard access
//!
//! The runtime talks to the clipboard through [`ClipboardBackend`] so tests
//! and headless runs can substitute their own.

use std::fmt;

/// Clipboard read/write failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The platform refused access (no display, permissions)
    Denied(String),
    /// The clipboard holds no text
    Empty,
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Denied(reason) => write!(f, "{}", reason),
            ClipboardError::Empty => write!(f, "clipboard is empty"),
        }
    }
}

impl std::error::Error for ClipboardError {}

pub trait ClipboardBackend {
    fn get_text(&mut self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<C: ClipboardBackend + ?Sized> ClipboardBackend for Box<C> {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        (**self).get_text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).set_text(text)
    }
}

/// The platform clipboard via `arboard`, opened per operation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Denied(e.to_string()))?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
            Err(e) => Err(ClipboardError::Denied(e.to_string())),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Denied(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Denied(e.to_string()))
    }
}

/// Always denies access; used when the system clipboard is turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClipboard;

impl ClipboardBackend for DisabledClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Denied("system clipboard disabled".to_string()))
    }

    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Denied("system clipboard disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_clipboard_denies() {
        let mut clipboard = DisabledClipboard;
        assert!(matches!(clipboard.get_text(), Err(ClipboardError::Denied(_))));
        assert!(clipboard.set_text("x").is_err());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ClipboardError::Empty.to_string(), "clipboard is empty");
        assert_eq!(
            ClipboardError::Denied("no display".to_string()).to_string(),
            "no display"
        );
    }
}
