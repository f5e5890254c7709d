//! In-memory catalog table and column mapping
//!
//! The catalog is an immutable snapshot of the parsed input file: ordered
//! column names plus rows of string cells. A cell is considered missing
//! when it is empty or whitespace-only, matching how blank CSV fields and
//! NA values arrive after parsing.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Maximum number of code columns a mapping may select
pub const MAX_CODE_COLUMNS: usize = 20;

/// Returns true when a cell holds no usable value
pub fn is_missing(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// An ordered, read-only table of string cells
#[derive(Debug, Clone)]
pub struct Catalog {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Catalog {
    /// Build a catalog from column names and rows. Short rows are padded
    /// with empty cells so every row has one cell per column.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { columns, rows }
    }

    /// Read a catalog from a CSV file with a header row
    pub fn from_csv_path(path: &Path) -> Result<Self, AnalysisError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| AnalysisError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_reader_inner(&mut reader).map_err(|e| match e {
            AnalysisError::Csv(source) => AnalysisError::CsvRead {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Read a catalog from any CSV source with a header row
    pub fn from_csv_reader<R: Read>(source: R) -> Result<Self, AnalysisError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        Self::from_reader_inner(&mut reader)
    }

    fn from_reader_inner<R: Read>(reader: &mut csv::Reader<R>) -> Result<Self, AnalysisError> {
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self::new(columns, rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column, or the fail-fast configuration error
    pub fn require_column(&self, name: &str) -> Result<usize, AnalysisError> {
        self.column_index(name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Iterate over the cells of one column
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    /// Count of non-missing cells in one column
    pub fn non_missing_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|c| !is_missing(c)).count()
    }
}

/// Selects which columns hold the product identifier, the free-text
/// description, and the ordered set of classification codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub id_column: String,
    pub description_column: String,
    pub code_columns: Vec<String>,
}

impl ColumnMapping {
    pub fn new(
        id_column: impl Into<String>,
        description_column: impl Into<String>,
        code_columns: Vec<String>,
    ) -> Self {
        Self {
            id_column: id_column.into(),
            description_column: description_column.into(),
            code_columns,
        }
    }

    /// All mapped column names, in mapping order
    pub fn all_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.id_column.as_str(), self.description_column.as_str()];
        cols.extend(self.code_columns.iter().map(|c| c.as_str()));
        cols
    }

    /// The classification target for readiness scoring: the first code column
    pub fn primary_code_column(&self) -> &str {
        self.code_columns
            .first()
            .map(|c| c.as_str())
            .unwrap_or_default()
    }

    /// Eager validation: code column count in range and every mapped
    /// column present in the table.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), AnalysisError> {
        let count = self.code_columns.len();
        if count == 0 || count > MAX_CODE_COLUMNS {
            return Err(AnalysisError::CodeColumnCount { count });
        }
        for column in self.all_columns() {
            catalog.require_column(column)?;
        }
        Ok(())
    }

    /// Auto-detect a mapping from column names: the id column contains
    /// "id" or "product", the description column contains "desc" or
    /// "name", and every remaining column is treated as a code column.
    pub fn detect(catalog: &Catalog) -> Result<Self, AnalysisError> {
        let columns = catalog.columns();
        if columns.len() < 3 {
            return Err(AnalysisError::InsufficientData(format!(
                "auto-detection needs at least 3 columns, table has {}",
                columns.len()
            )));
        }

        let id_column = columns
            .iter()
            .find(|c| {
                let lower = c.to_lowercase();
                lower.contains("id") || lower.contains("product")
            })
            .unwrap_or(&columns[0])
            .clone();

        let remaining: Vec<&String> = columns.iter().filter(|c| **c != id_column).collect();
        let description_column = remaining
            .iter()
            .find(|c| {
                let lower = c.to_lowercase();
                lower.contains("desc") || lower.contains("name")
            })
            .copied()
            .or_else(|| remaining.first().copied())
            .ok_or_else(|| {
                AnalysisError::InsufficientData("no candidate description column".to_string())
            })?
            .clone();

        let code_columns: Vec<String> = columns
            .iter()
            .filter(|c| **c != id_column && **c != description_column)
            .take(MAX_CODE_COLUMNS)
            .cloned()
            .collect();

        Ok(Self {
            id_column,
            description_column,
            code_columns,
        })
    }
}
