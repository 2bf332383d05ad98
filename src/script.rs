//! Replay scripts for the headless driver
//!
//! One action per line. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! down
//! shift+right
//! cmd+c
//! type Navy twill
//! click 2 0
//! drag 3 1
//! release
//! dblclick 0 4
//! save
//! ```

use std::fmt;

use crate::keymap::{parse_key_string, Keystroke};
use crate::messages::{GridMsg, Msg};

/// A single scripted action
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Key(Keystroke),
    Type(String),
    Click { row: usize, col: usize },
    Drag { row: usize, col: usize },
    Release,
    DoubleClick { row: usize, col: usize },
    Save,
}

impl ScriptStep {
    /// Messages for steps that map directly onto the grid
    ///
    /// `Type` and `Save` return `None`: the runtime types text one keystroke
    /// at a time and reports save outcomes itself.
    pub fn to_msg(&self) -> Option<Msg> {
        match self {
            ScriptStep::Key(k) => Some(Msg::Key(*k)),
            ScriptStep::Click { row, col } => Some(Msg::Grid(GridMsg::MouseDown {
                row: *row,
                col: *col,
            })),
            ScriptStep::Drag { row, col } => Some(Msg::Grid(GridMsg::MouseDrag {
                row: *row,
                col: *col,
            })),
            ScriptStep::Release => Some(Msg::Grid(GridMsg::MouseUp)),
            ScriptStep::DoubleClick { row, col } => Some(Msg::Grid(GridMsg::DoubleClick {
                row: *row,
                col: *col,
            })),
            ScriptStep::Type(_) | ScriptStep::Save => None,
        }
    }
}

/// Unreadable script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

pub fn parse_script(content: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let step = parse_line(line).map_err(|message| ScriptError {
            line: idx + 1,
            message,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<ScriptStep, String> {
    // Text after `type ` is taken verbatim, spaces included
    if let Some(text) = line.trim_start().strip_prefix("type ") {
        return Ok(ScriptStep::Type(text.to_string()));
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty line".to_string());
    };
    let args: Vec<&str> = words.collect();

    match head {
        "click" => cell_args(&args).map(|(row, col)| ScriptStep::Click { row, col }),
        "drag" => cell_args(&args).map(|(row, col)| ScriptStep::Drag { row, col }),
        "dblclick" => cell_args(&args).map(|(row, col)| ScriptStep::DoubleClick { row, col }),
        "release" if args.is_empty() => Ok(ScriptStep::Release),
        "save" if args.is_empty() => Ok(ScriptStep::Save),
        key if args.is_empty() => parse_key_string(key)
            .map(ScriptStep::Key)
            .map_err(|e| e.to_string()),
        _ => Err(format!("unexpected arguments after '{}'", head)),
    }
}

fn cell_args(args: &[&str]) -> Result<(usize, usize), String> {
    let [row, col] = args else {
        return Err(format!("expected '<row> <col>', got {} values", args.len()));
    };
    let row = row
        .parse()
        .map_err(|_| format!("invalid row '{}'", row))?;
    let col = col
        .parse()
        .map_err(|_| format!("invalid column '{}'", col))?;
    Ok((row, col))
}
