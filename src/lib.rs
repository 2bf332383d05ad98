//! Order grid - Elm-style spreadsheet engine for garment orders
//!
//! This crate provides the typed cell grid, keyboard and mouse selection,
//! inline editing, clipboard interchange and dirty-row sync behind a
//! message/update/command loop.

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod grid;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod persistence;
pub mod runtime;
pub mod script;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::GridConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use runtime::Runtime;
