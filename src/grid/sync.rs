//! Dirty-row reconciliation against the persistence layer
//!
//! A save snapshots every dirty row into a [`SaveBatch`], runs the batch
//! strictly in order against a [`RowStore`], and stops at the first failure.
//! Rows committed before the failure stay committed; the rest stay dirty for
//! the next save.

use std::fmt;

use super::model::GridState;
use super::selection::CellPosition;
use super::store::{GridStore, PersistedRow, Row, RowKey, RowRecord};

/// Persistence collaborator for grid rows
pub trait RowStore {
    /// Fetch all persisted rows in display order
    fn load_rows(&mut self) -> anyhow::Result<Vec<PersistedRow>>;

    /// Insert a row, returning the id assigned by the store
    fn create_row(&mut self, record: &RowRecord) -> anyhow::Result<String>;

    /// Overwrite an existing row
    fn update_row(&mut self, id: &str, record: &RowRecord) -> anyhow::Result<()>;

    /// Delete an existing row
    fn delete_row(&mut self, id: &str) -> anyhow::Result<()>;
}

/// Failure talking to the persistence layer
///
/// Carries the rendered cause so it can travel inside messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    Load { cause: String },
    Create { cause: String },
    Update { id: String, cause: String },
    Delete { id: String, cause: String },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Load { cause } => write!(f, "failed to load rows: {}", cause),
            SyncError::Create { cause } => write!(f, "failed to create row: {}", cause),
            SyncError::Update { id, cause } => {
                write!(f, "failed to update row {}: {}", id, cause)
            }
            SyncError::Delete { id, cause } => {
                write!(f, "failed to delete row {}: {}", id, cause)
            }
        }
    }
}

impl std::error::Error for SyncError {}

fn cause(e: &anyhow::Error) -> String {
    format!("{:#}", e)
}

/// One pending write captured from a dirty row
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    Create {
        key: RowKey,
        revision: u64,
        record: RowRecord,
    },
    Update {
        key: RowKey,
        revision: u64,
        id: String,
        record: RowRecord,
    },
}

impl PendingWrite {
    pub fn key(&self) -> RowKey {
        match self {
            PendingWrite::Create { key, .. } | PendingWrite::Update { key, .. } => *key,
        }
    }
}

/// A write that the store accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedWrite {
    pub key: RowKey,
    pub revision: u64,
    /// Id assigned on create
    pub persisted_id: Option<String>,
}

/// Outcome of running a batch against the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveResult {
    pub committed: Vec<CommittedWrite>,
    pub failure: Option<SyncError>,
    /// Writes in the batch, including those never attempted
    pub attempted: usize,
}

/// Snapshot of all dirty rows, in row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveBatch {
    writes: Vec<PendingWrite>,
}

impl SaveBatch {
    /// Capture every row where `is_new || is_modified`
    pub fn collect(store: &GridStore) -> Self {
        let writes = store
            .dirty_rows()
            .map(|row| {
                let record = store.record(row);
                match row.id().persisted() {
                    Some(id) if !row.is_new() => PendingWrite::Update {
                        key: row.key(),
                        revision: row.revision(),
                        id: id.to_string(),
                        record,
                    },
                    _ => PendingWrite::Create {
                        key: row.key(),
                        revision: row.revision(),
                        record,
                    },
                }
            })
            .collect();
        Self { writes }
    }

    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Run every write in order, each finishing before the next starts
    ///
    /// Stops at the first failure.
    pub fn run(self, store: &mut dyn RowStore) -> SaveResult {
        let mut result = SaveResult {
            attempted: self.writes.len(),
            ..Default::default()
        };

        for write in self.writes {
            match write {
                PendingWrite::Create {
                    key,
                    revision,
                    record,
                } => match store.create_row(&record) {
                    Ok(id) => {
                        tracing::debug!(row_key = key.raw(), %id, "row created");
                        result.committed.push(CommittedWrite {
                            key,
                            revision,
                            persisted_id: Some(id),
                        });
                    }
                    Err(e) => {
                        tracing::warn!("create failed: {:#}", e);
                        result.failure = Some(SyncError::Create { cause: cause(&e) });
                        break;
                    }
                },
                PendingWrite::Update {
                    key,
                    revision,
                    id,
                    record,
                } => match store.update_row(&id, &record) {
                    Ok(()) => {
                        tracing::debug!(row_key = key.raw(), %id, "row updated");
                        result.committed.push(CommittedWrite {
                            key,
                            revision,
                            persisted_id: None,
                        });
                    }
                    Err(e) => {
                        tracing::warn!("update of {} failed: {:#}", id, e);
                        result.failure = Some(SyncError::Update {
                            id,
                            cause: cause(&e),
                        });
                        break;
                    }
                },
            }
        }

        result
    }
}

/// Summary of a save for the surrounding UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Dirty rows the save started with
    pub attempted: usize,
    /// Rows actually committed
    pub committed: usize,
    pub error: Option<SyncError>,
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl GridStore {
    /// Apply batch results, returning the number of rows committed
    pub fn apply_save_result(&mut self, result: &SaveResult) -> usize {
        let mut applied = 0;
        for write in &result.committed {
            if self.apply_commit(write.key, write.revision, write.persisted_id.clone()) {
                applied += 1;
            } else {
                tracing::debug!(row_key = write.key.raw(), "committed row no longer present");
            }
        }
        applied
    }
}

impl GridState {
    /// Apply batch results to the underlying store
    pub fn apply_save_result(&mut self, result: &SaveResult) -> usize {
        self.store_mut().apply_save_result(result)
    }

    /// Replace all rows with those from the persistence layer
    ///
    /// Any inline edit is discarded and the selection returns to the origin.
    pub fn load_rows(&mut self, store: &mut dyn RowStore) -> Result<usize, SyncError> {
        self.cancel_edit();
        let count = load_from(store, self.store_mut())?;
        self.select_cell(CellPosition::new(0, 0));
        Ok(count)
    }

    /// Remove the row with `key` after its remote delete succeeded
    pub fn remove_row_by_key(&mut self, key: RowKey) -> Option<Row> {
        let index = self.store().position_of(key)?;
        self.remove_local_row(index)
    }
}

/// Load persisted rows into the store
pub fn load_from(store: &mut dyn RowStore, grid: &mut GridStore) -> Result<usize, SyncError> {
    let rows = store
        .load_rows()
        .map_err(|e| SyncError::Load { cause: cause(&e) })?;
    let count = rows.len();
    grid.load_persisted(rows);
    tracing::info!("Loaded {} rows", count);
    Ok(count)
}

/// Delete a persisted row through the store
pub fn delete_persisted(store: &mut dyn RowStore, id: &str) -> Result<(), SyncError> {
    store.delete_row(id).map_err(|e| {
        tracing::warn!("delete of {} failed: {:#}", id, e);
        SyncError::Delete {
            id: id.to_string(),
            cause: cause(&e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::schema::{Column, Schema, ValueType};
    use crate::grid::value::CellValue;
    use anyhow::anyhow;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_update_of: Option<String>,
        next_id: u64,
    }

    impl RowStore for Recorder {
        fn load_rows(&mut self) -> anyhow::Result<Vec<PersistedRow>> {
            Ok(Vec::new())
        }

        fn create_row(&mut self, _record: &RowRecord) -> anyhow::Result<String> {
            self.next_id += 1;
            self.calls.push(format!("create {}", self.next_id));
            Ok(format!("ord-{}", self.next_id))
        }

        fn update_row(&mut self, id: &str, _record: &RowRecord) -> anyhow::Result<()> {
            self.calls.push(format!("update {}", id));
            if self.fail_update_of.as_deref() == Some(id) {
                return Err(anyhow!("connection reset"));
            }
            Ok(())
        }

        fn delete_row(&mut self, id: &str) -> anyhow::Result<()> {
            self.calls.push(format!("delete {}", id));
            Ok(())
        }
    }

    fn grid_with_persisted(n: usize) -> GridStore {
        let schema = Schema::new(vec![Column::new("name", "Name", ValueType::Text)]).unwrap();
        let mut grid = GridStore::new(schema);
        grid.load_persisted(
            (1..=n)
                .map(|i| PersistedRow {
                    id: format!("p{}", i),
                    values: RowRecord::new(),
                })
                .collect(),
        );
        grid
    }

    #[test]
    fn test_collect_only_dirty_rows_in_order() {
        let mut grid = grid_with_persisted(3);
        grid.set_cell(2, "name", Some("c")).unwrap();
        grid.add_row();

        let batch = SaveBatch::collect(&grid);
        assert_eq!(batch.len(), 2);
        assert!(matches!(batch.writes()[0], PendingWrite::Update { ref id, .. } if id == "p3"));
        assert!(matches!(batch.writes()[1], PendingWrite::Create { .. }));
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let mut grid = grid_with_persisted(3);
        for row in 0..3 {
            grid.set_cell(row, "name", Some("x")).unwrap();
        }
        let mut store = Recorder {
            fail_update_of: Some("p2".to_string()),
            ..Default::default()
        };

        let result = SaveBatch::collect(&grid).run(&mut store);
        assert_eq!(store.calls, vec!["update p1", "update p2"]);
        assert_eq!(result.committed.len(), 1);
        assert!(matches!(result.failure, Some(SyncError::Update { ref id, .. }) if id == "p2"));

        assert_eq!(grid.apply_save_result(&result), 1);
        assert!(!grid.row(0).unwrap().is_dirty());
        assert!(grid.row(1).unwrap().is_dirty());
        assert!(grid.row(2).unwrap().is_dirty());
    }

    #[test]
    fn test_create_assigns_persisted_id() {
        let schema = Schema::new(vec![Column::new("name", "Name", ValueType::Text)]).unwrap();
        let mut grid = GridStore::new(schema);
        grid.add_row();
        grid.set_cell(0, "name", Some("Ava")).unwrap();

        let mut store = Recorder::default();
        let result = SaveBatch::collect(&grid).run(&mut store);
        grid.apply_save_result(&result);

        let row = grid.row(0).unwrap();
        assert_eq!(row.id().persisted(), Some("ord-1"));
        assert!(!row.is_dirty());
        assert_eq!(row.value(0), &CellValue::text("Ava"));
    }

    #[test]
    fn test_edit_during_save_stays_dirty() {
        let mut grid = grid_with_persisted(1);
        grid.set_cell(0, "name", Some("a")).unwrap();
        let batch = SaveBatch::collect(&grid);

        grid.set_cell(0, "name", Some("b")).unwrap();
        let result = batch.run(&mut Recorder::default());
        grid.apply_save_result(&result);

        assert!(grid.row(0).unwrap().is_modified());
    }

    #[test]
    fn test_remove_row_by_key_tracks_moves() {
        let mut state = GridState::new(grid_with_persisted(3));
        let key = state.store().row(2).unwrap().key();
        state.remove_local_row(0);

        let removed = state.remove_row_by_key(key).unwrap();
        assert_eq!(removed.id().persisted(), Some("p3"));
        assert_eq!(state.row_count(), 1);
        assert!(state.remove_row_by_key(key).is_none());
    }

    #[test]
    fn test_error_display_includes_cause() {
        let err = SyncError::Update {
            id: "p2".to_string(),
            cause: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "failed to update row p2: timeout");
    }
}
