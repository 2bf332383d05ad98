//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! selection, editing and save issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=selection=debug,keymap=trace` - scoped filtering
//! - `RUST_LOG=ordergrid::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/ordergrid/logs/ordergrid.log` with daily
//! rotation, always at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::grid::{CellPosition, GridState};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes
/// to `~/.config/ordergrid/logs/ordergrid.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so grid output on stdout stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "ordergrid.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of selection/editing state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub anchor: CellPosition,
    pub focus: CellPosition,
    pub editing: Option<CellPosition>,
    pub row_count: usize,
}

impl SelectionSnapshot {
    pub fn from_grid(grid: &GridState) -> Self {
        let selection = grid.selection();
        Self {
            anchor: selection.anchor(),
            focus: selection.focus(),
            editing: grid.editing_position(),
            row_count: grid.row_count(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.row_count != other.row_count {
            changes.push(format!("rows: {} → {}", self.row_count, other.row_count));
        }
        if self.focus != other.focus {
            changes.push(format!("focus: {} → {}", self.focus, other.focus));
        }
        if self.anchor != other.anchor {
            changes.push(format!("anchor: {} → {}", self.anchor, other.anchor));
        }
        match (self.editing, other.editing) {
            (None, Some(pos)) => changes.push(format!("editing {}", pos)),
            (Some(pos), None) => changes.push(format!("stopped editing {}", pos)),
            _ => {}
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
