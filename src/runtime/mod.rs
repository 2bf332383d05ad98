//! Runtime module - executes commands and feeds results back as messages
//!
//! - `app` - the message loop around `update`, the row store and the clipboard

pub mod app;

pub use app::Runtime;
