//! Grid store: the ordered row sequence and per-row lifecycle flags
//!
//! The store is the sole owner of row data. Selection and editing only ever
//! refer to rows by index.

use std::collections::BTreeMap;
use std::fmt;

use super::schema::{CoercionError, Schema};
use super::value::CellValue;

/// Prefix reserved for rows that have not been persisted yet
pub const PLACEHOLDER_PREFIX: &str = "local:";

/// Column key → value mapping sent to and received from the persistence layer
pub type RowRecord = BTreeMap<String, CellValue>;

/// Stable in-memory handle for a row
///
/// Unlike indices, keys survive insertions and removals, so an in-flight save
/// can find its rows again when the results arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

impl RowKey {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Identity of a row: persisted id, or local placeholder for unsaved rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Persisted(String),
    Local(u64),
}

impl RowId {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RowId::Local(_))
    }

    /// The persisted id, if any
    pub fn persisted(&self) -> Option<&str> {
        match self {
            RowId::Persisted(id) => Some(id),
            RowId::Local(_) => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Persisted(id) => f.write_str(id),
            RowId::Local(n) => write!(f, "{}{}", PLACEHOLDER_PREFIX, n),
        }
    }
}

/// A single grid row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: RowKey,
    id: RowId,
    /// One value per schema column, in column order
    values: Vec<CellValue>,
    is_new: bool,
    is_modified: bool,
    /// Bumped on every accepted write
    revision: u64,
}

impl Row {
    pub fn key(&self) -> RowKey {
        self.key
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Value at column index (out-of-range reads as `Empty`)
    pub fn value(&self, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.values.get(col).unwrap_or(EMPTY)
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Row has unsaved local changes
    pub fn is_dirty(&self) -> bool {
        self.is_new || self.is_modified
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Short badge for rendering dirty state
    pub fn badge(&self) -> &'static str {
        if self.is_new {
            "+"
        } else if self.is_modified {
            "*"
        } else {
            " "
        }
    }
}

/// Row loaded from the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRow {
    pub id: String,
    pub values: RowRecord,
}

/// Reason a cell write did not happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellWriteError {
    RowOutOfBounds(usize),
    ColumnOutOfBounds(usize),
    UnknownColumn(String),
    Rejected(CoercionError),
}

impl fmt::Display for CellWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellWriteError::RowOutOfBounds(row) => write!(f, "row {} does not exist", row),
            CellWriteError::ColumnOutOfBounds(col) => {
                write!(f, "column {} does not exist", col)
            }
            CellWriteError::UnknownColumn(key) => write!(f, "unknown column '{}'", key),
            CellWriteError::Rejected(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CellWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CellWriteError::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoercionError> for CellWriteError {
    fn from(e: CoercionError) -> Self {
        CellWriteError::Rejected(e)
    }
}

/// Ordered row storage bound to a schema
#[derive(Debug, Clone)]
pub struct GridStore {
    schema: Schema,
    rows: Vec<Row>,
    next_key: u64,
    next_placeholder: u64,
}

impl GridStore {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            next_key: 0,
            next_placeholder: 1,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value at position (out-of-range reads as `Empty`)
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows.get(row).map(|r| r.value(col)).unwrap_or(EMPTY)
    }

    /// Current index of a row key
    pub fn position_of(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|r| r.key == key)
    }

    fn allocate_key(&mut self) -> RowKey {
        let key = RowKey(self.next_key);
        self.next_key += 1;
        key
    }

    /// Append an empty unsaved row, returning its index
    pub fn add_row(&mut self) -> usize {
        let key = self.allocate_key();
        let id = RowId::Local(self.next_placeholder);
        self.next_placeholder += 1;

        self.rows.push(Row {
            key,
            id,
            values: vec![CellValue::Empty; self.schema.len()],
            is_new: true,
            is_modified: false,
            revision: 0,
        });

        tracing::debug!(row = self.rows.len() - 1, "added row");
        self.rows.len() - 1
    }

    /// Replace the row sequence with rows loaded from the persistence layer
    ///
    /// Keys absent from a record read as `Empty`; unknown keys are ignored.
    pub fn load_persisted(&mut self, records: Vec<PersistedRow>) {
        self.rows.clear();
        for record in records {
            let key = self.allocate_key();
            let values = self
                .schema
                .columns()
                .iter()
                .map(|c| record.values.get(&c.key).cloned().unwrap_or_default())
                .collect();

            self.rows.push(Row {
                key,
                id: RowId::Persisted(record.id),
                values,
                is_new: false,
                is_modified: false,
                revision: 0,
            });
        }
    }

    /// Coerce `raw` through the column type and write it (`None` clears)
    pub fn set_cell(
        &mut self,
        row: usize,
        column_key: &str,
        raw: Option<&str>,
    ) -> Result<(), CellWriteError> {
        let col = self
            .schema
            .index_of(column_key)
            .ok_or_else(|| CellWriteError::UnknownColumn(column_key.to_string()))?;
        self.set_cell_at(row, col, raw)
    }

    /// Index-based variant of [`GridStore::set_cell`]
    pub fn set_cell_at(
        &mut self,
        row: usize,
        col: usize,
        raw: Option<&str>,
    ) -> Result<(), CellWriteError> {
        if row >= self.rows.len() {
            return Err(CellWriteError::RowOutOfBounds(row));
        }
        let column = self
            .schema
            .column(col)
            .ok_or(CellWriteError::ColumnOutOfBounds(col))?;

        let value = match raw {
            Some(raw) => column.coerce(raw)?,
            None => CellValue::Empty,
        };

        let target = &mut self.rows[row];
        target.values[col] = value;
        target.revision += 1;
        if !target.is_new {
            target.is_modified = true;
        }
        Ok(())
    }

    /// Remove a row from local storage without contacting persistence
    pub fn remove_local(&mut self, index: usize) -> Option<Row> {
        if index >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(index))
    }

    /// Rows with unsaved changes, in iteration order
    pub fn dirty_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.is_dirty())
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty_rows().count()
    }

    /// Record form of a row for the persistence layer
    pub fn record(&self, row: &Row) -> RowRecord {
        self.schema
            .columns()
            .iter()
            .zip(&row.values)
            .map(|(c, v)| (c.key.clone(), v.clone()))
            .collect()
    }

    /// Apply a successful create/update to the row with `key`
    ///
    /// `is_modified` is only cleared if nothing was written since the batch
    /// captured `revision`. Returns false if the row no longer exists.
    pub fn apply_commit(
        &mut self,
        key: RowKey,
        revision: u64,
        persisted_id: Option<String>,
    ) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.key == key) else {
            return false;
        };

        let edited_since = row.revision != revision;
        if let Some(id) = persisted_id {
            row.id = RowId::Persisted(id);
            row.is_new = false;
            row.is_modified = edited_since;
        } else if !edited_since {
            row.is_modified = false;
        }
        true
    }
}
