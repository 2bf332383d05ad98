//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use anyhow::{anyhow, bail};

use ordergrid::clipboard::{ClipboardBackend, ClipboardError};
use ordergrid::grid::{
    CellPosition, CellValue, Column, GridState, GridStore, PersistedRow, RowRecord, RowStore,
    Schema, ValueType,
};
use ordergrid::keymap::{load_keymap_with_overrides, parse_key_string, Keymap};
use ordergrid::{AppModel, Runtime};

pub type TestRuntime = Runtime<MemoryStore, FakeClipboard>;

// ========================================================================
// Collaborators
// ========================================================================

/// In-memory row store with injectable failures and a call log
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub rows: Vec<PersistedRow>,
    /// `create`, `update:<id>`, `delete:<id>` in call order
    pub calls: Vec<String>,
    next_id: u64,
    pub fail_load: bool,
    pub fail_creates: bool,
    /// Ids whose update fails
    pub fail_updates: Vec<String>,
    pub fail_deletes: bool,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<PersistedRow>) -> Self {
        let next_id = rows.len() as u64;
        Self {
            rows,
            next_id,
            ..Default::default()
        }
    }

    pub fn record(&self, id: &str) -> Option<&RowRecord> {
        self.rows.iter().find(|r| r.id == id).map(|r| &r.values)
    }
}

impl RowStore for MemoryStore {
    fn load_rows(&mut self) -> anyhow::Result<Vec<PersistedRow>> {
        if self.fail_load {
            bail!("store offline");
        }
        Ok(self.rows.clone())
    }

    fn create_row(&mut self, record: &RowRecord) -> anyhow::Result<String> {
        self.calls.push("create".to_string());
        if self.fail_creates {
            bail!("insert refused");
        }
        self.next_id += 1;
        let id = format!("mem-{}", self.next_id);
        self.rows.push(PersistedRow {
            id: id.clone(),
            values: record.clone(),
        });
        Ok(id)
    }

    fn update_row(&mut self, id: &str, record: &RowRecord) -> anyhow::Result<()> {
        self.calls.push(format!("update:{}", id));
        if self.fail_updates.iter().any(|f| f == id) {
            bail!("update refused");
        }
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow!("no row {}", id))?;
        row.values = record.clone();
        Ok(())
    }

    fn delete_row(&mut self, id: &str) -> anyhow::Result<()> {
        self.calls.push(format!("delete:{}", id));
        if self.fail_deletes {
            bail!("delete refused");
        }
        self.rows.retain(|r| r.id != id);
        Ok(())
    }
}

/// Clipboard double with a deny switch
#[derive(Debug, Default)]
pub struct FakeClipboard {
    pub text: Option<String>,
    pub denied: bool,
    pub reads: usize,
    pub writes: usize,
}

impl FakeClipboard {
    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Default::default()
        }
    }
}

impl ClipboardBackend for FakeClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.reads += 1;
        if self.denied {
            return Err(ClipboardError::Denied("permission denied".to_string()));
        }
        self.text.clone().ok_or(ClipboardError::Empty)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes += 1;
        if self.denied {
            return Err(ClipboardError::Denied("permission denied".to_string()));
        }
        self.text = Some(text.to_string());
        Ok(())
    }
}

// ========================================================================
// Builders
// ========================================================================

/// Text `name`, Number `qty`
pub fn text_number_schema() -> Schema {
    Schema::new(vec![
        Column::new("name", "Name", ValueType::Text),
        Column::new("qty", "Qty", ValueType::Number),
    ])
    .unwrap()
}

/// Text, Number, Number, Enum
pub fn order_schema() -> Schema {
    Schema::new(vec![
        Column::new("client", "Client", ValueType::Text),
        Column::new("qty", "Qty", ValueType::Number),
        Column::new("cost", "Cost", ValueType::Number),
        Column::new(
            "status",
            "Status",
            ValueType::Enum(vec!["Draft".to_string(), "Shipped".to_string()]),
        ),
    ])
    .unwrap()
}

/// Persisted rows `id-0..` built from raw cell strings in schema order
pub fn persisted_rows(schema: &Schema, rows: &[&[&str]]) -> Vec<PersistedRow> {
    rows.iter()
        .enumerate()
        .map(|(i, cells)| {
            let values = schema
                .columns()
                .iter()
                .zip(cells.iter())
                .map(|(column, raw)| (column.key.clone(), column.coerce(raw).unwrap()))
                .collect();
            PersistedRow {
                id: format!("id-{}", i),
                values,
            }
        })
        .collect()
}

pub fn test_keymap() -> Keymap {
    Keymap::with_bindings(load_keymap_with_overrides(None))
}

/// Runtime whose grid holds `rows` loaded from a memory store
pub fn test_runtime(schema: Schema, rows: &[&[&str]]) -> TestRuntime {
    test_runtime_with(schema, rows, FakeClipboard::default())
}

pub fn test_runtime_with(schema: Schema, rows: &[&[&str]], clipboard: FakeClipboard) -> TestRuntime {
    let store = MemoryStore::with_rows(persisted_rows(&schema, rows));
    let model = AppModel::new(GridState::new(GridStore::new(schema)), test_keymap());
    let mut runtime = Runtime::new(model, store, clipboard);
    runtime.load().unwrap();
    runtime
}

/// Runtime with `count` new (unsaved) empty rows
pub fn runtime_with_new_rows(schema: Schema, count: usize) -> TestRuntime {
    let mut runtime = test_runtime(schema, &[]);
    for _ in 0..count {
        press(&mut runtime, "cmd+shift+n");
    }
    runtime
}

// ========================================================================
// Interaction helpers
// ========================================================================

pub fn press(runtime: &mut TestRuntime, key: &str) {
    runtime.handle_key(parse_key_string(key).unwrap());
}

pub fn press_all(runtime: &mut TestRuntime, keys: &[&str]) {
    for key in keys {
        press(runtime, key);
    }
}

pub fn click(runtime: &mut TestRuntime, row: usize, col: usize) {
    runtime.dispatch(ordergrid::Msg::mouse_down(row, col));
    runtime.dispatch(ordergrid::Msg::Grid(ordergrid::messages::GridMsg::MouseUp));
}

pub fn cell(runtime: &TestRuntime, row: usize, col: usize) -> CellValue {
    runtime.grid().store().get(row, col).clone()
}

pub fn focus(runtime: &TestRuntime) -> CellPosition {
    runtime.grid().focus()
}

pub fn pos(row: usize, col: usize) -> CellPosition {
    CellPosition::new(row, col)
}
