//! JSON file row store
//!
//! Keeps every persisted order row in one JSON document and rewrites it
//! after each mutation.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::{PersistedRow, RowRecord, RowStore};

/// Prefix of ids assigned by this store
pub const ID_PREFIX: &str = "ord-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoredRow {
    id: String,
    values: RowRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version for forward compatibility
    #[serde(default)]
    version: u32,
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    rows: Vec<StoredRow>,
}

fn first_id() -> u64 {
    1
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: JsonFileStore::CURRENT_VERSION,
            next_id: first_id(),
            rows: Vec::new(),
        }
    }
}

/// Row store backed by a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreFile,
}

impl JsonFileStore {
    pub const CURRENT_VERSION: u32 = 1;

    /// Open a store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading row store {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing row store {}", path.display()))?
        } else {
            tracing::info!("Row store {} not found, starting empty", path.display());
            StoreFile::default()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.rows.is_empty()
    }

    /// Write `data` to disk and adopt it only once the write succeeded
    fn commit(&mut self, data: StoreFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let contents = serde_json::to_string_pretty(&data)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("writing row store {}", self.path.display()))?;
        self.data = data;
        Ok(())
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.data.rows.iter().position(|r| r.id == id)
    }
}

impl RowStore for JsonFileStore {
    fn load_rows(&mut self) -> Result<Vec<PersistedRow>> {
        Ok(self
            .data
            .rows
            .iter()
            .map(|r| PersistedRow {
                id: r.id.clone(),
                values: r.values.clone(),
            })
            .collect())
    }

    fn create_row(&mut self, record: &RowRecord) -> Result<String> {
        let mut next = self.data.clone();
        let id = format!("{}{}", ID_PREFIX, next.next_id);
        next.next_id += 1;
        next.rows.push(StoredRow {
            id: id.clone(),
            values: record.clone(),
        });
        self.commit(next)?;
        Ok(id)
    }

    fn update_row(&mut self, id: &str, record: &RowRecord) -> Result<()> {
        let index = self
            .find(id)
            .ok_or_else(|| anyhow!("no row with id {}", id))?;
        let mut next = self.data.clone();
        next.rows[index].values = record.clone();
        self.commit(next)
    }

    fn delete_row(&mut self, id: &str) -> Result<()> {
        let Some(index) = self.find(id) else {
            bail!("no row with id {}", id);
        };
        let mut next = self.data.clone();
        next.rows.remove(index);
        self.commit(next)
    }
}
