use std::collections::HashMap;
use std::sync::Arc;
use std::vec::IntoIter;

use crate::error::{DbalError, Result};
use crate::types::{RawQueryResult, Row};

/// Shape of a fetched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Values in column order.
    Num,
    /// `column -> value` map.
    Assoc,
    /// Both: a [`Row`] addressable by position and by name.
    #[default]
    Both,
}

/// A row as returned by [`ResultSet::fetch_array`] and [`ResultSet::fetch_all`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedRow {
    Num(Vec<Option<String>>),
    Assoc(HashMap<String, Option<String>>),
    Both(Row),
}

impl FetchedRow {
    fn from_row(row: Row, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Num => FetchedRow::Num(row.into_values()),
            FetchMode::Assoc => FetchedRow::Assoc(row.into_map()),
            FetchMode::Both => FetchedRow::Both(row),
        }
    }
}

/// Forward-only cursor over the rows returned by a query.
///
/// Rows are buffered when the statement completes, so the counts are known
/// up front. Once [`free`](ResultSet::free) is called every fetch fails with
/// [`DbalError::ResultFreed`]; running off the end is not an error and
/// yields `Ok(None)`.
#[derive(Debug)]
pub struct ResultSet {
    columns: Arc<[String]>,
    total_rows: usize,
    rows: Option<IntoIter<Vec<Option<String>>>>,
}

impl ResultSet {
    /// Creates a ResultSet from a RawQueryResult.
    pub fn from_raw(raw: RawQueryResult) -> Self {
        Self {
            columns: raw.columns.into(),
            total_rows: raw.rows.len(),
            rows: Some(raw.rows.into_iter()),
        }
    }

    pub fn empty() -> Self {
        Self::from_raw(RawQueryResult::empty())
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let rows = self.rows.as_mut().ok_or(DbalError::ResultFreed)?;
        Ok(rows
            .next()
            .map(|values| Row::new(Arc::clone(&self.columns), values)))
    }

    /// Next row as values in column order.
    pub fn fetch_row(&mut self) -> Result<Option<Vec<Option<String>>>> {
        Ok(self.next_row()?.map(Row::into_values))
    }

    /// Next row as a `column -> value` map.
    pub fn fetch_assoc(&mut self) -> Result<Option<HashMap<String, Option<String>>>> {
        Ok(self.next_row()?.map(Row::into_map))
    }

    /// Next row in the requested shape.
    pub fn fetch_array(&mut self, mode: FetchMode) -> Result<Option<FetchedRow>> {
        Ok(self.next_row()?.map(|row| FetchedRow::from_row(row, mode)))
    }

    /// Drains every remaining row in the requested shape.
    pub fn fetch_all(&mut self, mode: FetchMode) -> Result<Vec<FetchedRow>> {
        let mut out = Vec::new();
        while let Some(row) = self.fetch_array(mode)? {
            out.push(row);
        }
        Ok(out)
    }

    /// Total rows in the result, independent of the cursor position.
    pub fn num_rows(&self) -> Result<usize> {
        self.ensure_live()?;
        Ok(self.total_rows)
    }

    pub fn num_fields(&self) -> Result<usize> {
        self.ensure_live()?;
        Ok(self.columns.len())
    }

    pub fn field_names(&self) -> Result<&[String]> {
        self.ensure_live()?;
        Ok(&self.columns[..])
    }

    /// Releases the buffered rows. Calling it twice is harmless.
    pub fn free(&mut self) {
        self.rows = None;
    }

    pub fn is_freed(&self) -> bool {
        self.rows.is_none()
    }

    fn ensure_live(&self) -> Result<()> {
        if self.rows.is_none() {
            return Err(DbalError::ResultFreed);
        }
        Ok(())
    }
}

/// Iterates the remaining rows. A freed result set iterates as empty;
/// use the `fetch_*` methods to observe [`DbalError::ResultFreed`].
impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().ok().flatten()
    }
}
