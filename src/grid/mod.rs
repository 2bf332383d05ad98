//! Order grid domain
//!
//! A typed spreadsheet over a column schema: rows with dirty tracking,
//! a rectangular selection, a single inline editor, a tab/newline clipboard
//! codec, and the batch save contract against a persistence collaborator.
//!
//! [`GridState`] is the only mutation surface; the submodules extend it with
//! navigation and clipboard operations.

mod clipboard;
mod editing;
mod model;
mod navigation;
mod parser;
mod schema;
mod selection;
mod store;
mod sync;
mod value;

pub use clipboard::{parse_clipboard_text, serialize_range, ClipboardBuffer, PasteSummary};
pub use editing::{CellEdit, CellEditState};
pub use model::GridState;
pub use parser::{detect_delimiter, export_csv, parse_csv, Delimiter, ImportSummary, ParseError};
pub use schema::{CoercionError, Column, Schema, SchemaError, ValueType};
pub use selection::{CellPosition, SelectionModel, SelectionRange};
pub use store::{
    CellWriteError, GridStore, PersistedRow, Row, RowId, RowKey, RowRecord, PLACEHOLDER_PREFIX,
};
pub use sync::{
    delete_persisted, load_from, CommittedWrite, PendingWrite, RowStore, SaveBatch, SaveOutcome,
    SaveResult, SyncError,
};
pub use value::CellValue;
