//! Column schema and per-type coercion
//!
//! The schema is fixed for the lifetime of a grid. Column order is display and
//! navigation order. Every raw string that reaches a cell, whether typed into
//! the inline editor or pasted, goes through [`Column::coerce`].

use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::value::CellValue;

/// Input date forms accepted by date columns, tried in order
const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Canonical stored date form
const DATE_STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Value type of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Number,
    Date,
    Enum(Vec<String>),
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Enum(_) => "enum",
        }
    }
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub value_type: ValueType,
    /// Required text columns keep empty strings instead of normalizing to null
    pub required: bool,
}

/// Write rejected by a column's type rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    NotAnOption { column: String, value: String },
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionError::NotAnOption { column, value } => {
                write!(f, "'{}' is not a valid option for {}", value, column)
            }
        }
    }
}

impl std::error::Error for CoercionError {}

impl Column {
    pub fn new(key: &str, label: &str, value_type: ValueType) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value_type,
            required: false,
        }
    }

    /// Mark this column as required (builder pattern)
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Convert a raw string into this column's native value
    ///
    /// Unparseable numbers and dates become `Empty`. Only enum columns can
    /// reject a write outright.
    pub fn coerce(&self, raw: &str) -> Result<CellValue, CoercionError> {
        match &self.value_type {
            ValueType::Text => Ok(self.coerce_text(raw)),
            ValueType::Number => Ok(coerce_number(raw)),
            ValueType::Date => Ok(coerce_date(raw)),
            ValueType::Enum(options) => self.coerce_enum(raw, options),
        }
    }

    fn coerce_text(&self, raw: &str) -> CellValue {
        if raw.is_empty() && !self.required {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    fn coerce_enum(&self, raw: &str, options: &[String]) -> Result<CellValue, CoercionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(CellValue::Empty);
        }

        if let Some(exact) = options.iter().find(|o| o.as_str() == trimmed) {
            return Ok(CellValue::Text(exact.clone()));
        }

        options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(trimmed))
            .map(|o| CellValue::Text(o.clone()))
            .ok_or_else(|| CoercionError::NotAnOption {
                column: self.label.clone(),
                value: trimmed.to_string(),
            })
    }
}

/// Parse a number, accepting a comma as decimal separator
fn coerce_number(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }

    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => {
            tracing::debug!(raw = %raw, "number coercion failed, storing null");
            CellValue::Empty
        }
    }
}

/// Parse a date in any accepted form and store it as ISO `YYYY-MM-DD`
fn coerce_date(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }

    let parsed = DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        });

    match parsed {
        Some(date) => CellValue::Text(date.format(DATE_STORAGE_FORMAT).to_string()),
        None => {
            tracing::debug!(raw = %raw, "date coercion failed, storing null");
            CellValue::Empty
        }
    }
}

/// Error building or loading a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    NoColumns,
    DuplicateKey(String),
    EmptyOptions(String),
    UnknownType { key: String, kind: String },
    Io(String),
    Parse(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NoColumns => write!(f, "schema has no columns"),
            SchemaError::DuplicateKey(key) => write!(f, "duplicate column key '{}'", key),
            SchemaError::EmptyOptions(key) => {
                write!(f, "enum column '{}' has no options", key)
            }
            SchemaError::UnknownType { key, kind } => {
                write!(f, "column '{}' has unknown type '{}'", key, kind)
            }
            SchemaError::Io(e) => write!(f, "failed to read schema: {}", e),
            SchemaError::Parse(e) => write!(f, "failed to parse schema: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Root of a schema YAML file
#[derive(Debug, Serialize, Deserialize)]
struct SchemaConfig {
    columns: Vec<ColumnConfig>,
}

/// A single column entry from YAML
#[derive(Debug, Serialize, Deserialize)]
struct ColumnConfig {
    key: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    required: bool,
}

fn default_kind() -> String {
    "text".to_string()
}

/// Ordered list of columns with unique keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::NoColumns);
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.key == column.key) {
                return Err(SchemaError::DuplicateKey(column.key.clone()));
            }
            if let ValueType::Enum(options) = &column.value_type {
                if options.is_empty() {
                    return Err(SchemaError::EmptyOptions(column.key.clone()));
                }
            }
        }

        Ok(Self { columns })
    }

    /// Parse a schema from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let config: SchemaConfig =
            serde_yaml::from_str(yaml).map_err(|e| SchemaError::Parse(e.to_string()))?;

        let mut columns = Vec::with_capacity(config.columns.len());
        for entry in config.columns {
            let value_type = match entry.kind.to_lowercase().as_str() {
                "text" | "string" => ValueType::Text,
                "number" | "numeric" => ValueType::Number,
                "date" => ValueType::Date,
                "enum" | "select" => ValueType::Enum(entry.options),
                _ => {
                    return Err(SchemaError::UnknownType {
                        key: entry.key,
                        kind: entry.kind,
                    })
                }
            };
            let label = entry.label.unwrap_or_else(|| entry.key.clone());
            columns.push(Column {
                key: entry.key,
                label,
                value_type,
                required: entry.required,
            });
        }

        Self::new(columns)
    }

    /// Load a schema from a YAML file
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io(e.to_string()))?;
        let schema = Self::from_yaml(&content)?;
        tracing::info!(
            "Loaded schema from {} ({} columns)",
            path.display(),
            schema.len()
        );
        Ok(schema)
    }

    /// Built-in schema for the garment order sheet
    pub fn garment_orders() -> Self {
        let status = ["Draft", "Cutting", "Sewing", "Finishing", "Shipped"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        Self {
            columns: vec![
                Column::new("order_no", "Order No", ValueType::Text).required(),
                Column::new("client", "Client", ValueType::Text),
                Column::new("fabric", "Fabric", ValueType::Text),
                Column::new("colour", "Colour", ValueType::Text),
                Column::new("quantity", "Quantity", ValueType::Number),
                Column::new("unit_cost", "Unit Cost", ValueType::Number),
                Column::new("due_date", "Due Date", ValueType::Date),
                Column::new("status", "Status", ValueType::Enum(status)),
            ],
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Find a column by key, falling back to a case-insensitive label match
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.index_of(name).or_else(|| {
            self.columns
                .iter()
                .position(|c| c.label.eq_ignore_ascii_case(name))
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
