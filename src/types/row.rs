use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DbalError, Result};

/// Driver-agnostic raw result from a row-producing statement.
/// All values are text as sent by the server; `None` is SQL NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// What a backend reports after executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    /// The statement produced a row set (possibly empty).
    Rows(RawQueryResult),
    /// The statement changed this many rows.
    Affected(u64),
}

/// A single fetched row.
/// Values are accessible by position or by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Option<String>>) -> Self {
        Self { columns, values }
    }

    /// Gets a value by column name. If the name repeats, the last column wins.
    pub fn get(&self, column: &str) -> Result<Option<&str>> {
        self.columns
            .iter()
            .rposition(|c| c == column)
            .map(|i| self.values.get(i).and_then(|v| v.as_deref()))
            .ok_or_else(|| DbalError::ColumnNotFound(column.to_string()))
    }

    /// Gets a value by position.
    pub fn get_index(&self, index: usize) -> Option<Option<&str>> {
        self.values.get(index).map(|v| v.as_deref())
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }

    /// Converts the row into a `column -> value` map.
    pub fn into_map(self) -> HashMap<String, Option<String>> {
        self.columns.iter().cloned().zip(self.values).collect()
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
