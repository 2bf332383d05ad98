//! CSV import/export using the csv crate
//!
//! RFC 4180 compliant parsing with support for quoted fields,
//! escaped quotes, and custom delimiters.

use std::io::Cursor;

use super::model::GridState;
use super::store::GridStore;

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Detect delimiter from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "tsv" => Delimiter::Tab,
            "psv" => Delimiter::Pipe,
            _ => Delimiter::Comma,
        }
    }
}

/// Error type for CSV parsing and writing
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "CSV parse error at line {}: {}", line, self.message),
            None => write!(f, "CSV error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse CSV content into raw string rows
pub fn parse_csv(content: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>, ParseError> {
    let cursor = Cursor::new(content.as_bytes());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.char() as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(cursor);

    let mut rows: Vec<Vec<String>> = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                rows.push(record.iter().map(|s| s.to_string()).collect());
            }
            Err(e) => {
                return Err(ParseError {
                    message: e.to_string(),
                    line: Some(line_num + 1),
                });
            }
        }
    }

    Ok(rows)
}

/// Detect delimiter by analyzing first few lines
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let pipe_count = first_lines.matches('|').count();
    let semi_count = first_lines.matches(';').count();

    let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

    if max == 0 {
        return Delimiter::Comma;
    }

    if tab_count == max {
        Delimiter::Tab
    } else if pipe_count == max {
        Delimiter::Pipe
    } else if semi_count == max {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Result of importing rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    /// Cells rejected by their column type
    pub rejected: usize,
    /// Header cells that matched no column
    pub unmatched_headers: Vec<String>,
}

impl GridState {
    /// Append parsed rows as new rows
    ///
    /// If the first row names columns (by key or label) it is used as the
    /// header; otherwise every row is data in schema order.
    pub fn import_rows(&mut self, rows: &[Vec<String>]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        let Some(first) = rows.first() else {
            return summary;
        };

        let schema = self.store().schema();
        let header: Vec<Option<usize>> = first.iter().map(|name| schema.resolve(name)).collect();

        let (mapping, data) = if header.iter().any(Option::is_some) {
            summary.unmatched_headers = first
                .iter()
                .zip(&header)
                .filter(|(_, m)| m.is_none())
                .map(|(name, _)| name.clone())
                .collect();
            (header, &rows[1..])
        } else {
            ((0..first.len()).map(|c| (c < schema.len()).then_some(c)).collect(), rows)
        };

        for raw_row in data {
            let index = self.add_row();
            for (raw, col) in raw_row.iter().zip(&mapping) {
                let Some(col) = *col else { continue };
                if self
                    .store_mut()
                    .set_cell_at(index, col, Some(raw))
                    .is_err()
                {
                    summary.rejected += 1;
                }
            }
            summary.rows += 1;
        }

        tracing::info!(
            rows = summary.rows,
            rejected = summary.rejected,
            "imported rows"
        );
        summary
    }
}

/// Export the grid with a header row of column keys
pub fn export_csv(store: &GridStore, delimiter: Delimiter) -> Result<String, ParseError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.char() as u8)
        .from_writer(Vec::new());

    let to_error = |e: csv::Error| ParseError {
        message: e.to_string(),
        line: None,
    };

    writer
        .write_record(store.schema().columns().iter().map(|c| c.key.as_str()))
        .map_err(to_error)?;

    for row in store.rows() {
        writer
            .write_record(row.values().iter().map(|v| v.to_string()))
            .map_err(to_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| ParseError {
        message: e.to_string(),
        line: None,
    })?;

    String::from_utf8(bytes).map_err(|e| ParseError {
        message: e.to_string(),
        line: None,
    })
}
