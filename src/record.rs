//! Header-keyed CSV records.
//!
//! A [`Record`] is one data row. Its column names live in a shared list owned
//! by the [`RecordSet`], so every record in a set has the same key set and the
//! header is stored once.

use std::sync::Arc;

/// Column names in header order, shared by every record of a set.
pub type Columns = Arc<[String]>;

/// A single row: column name to cell value, in header order.
///
/// A cell is `None` when the source row was shorter than the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    row: usize,
    columns: Columns,
    values: Vec<Option<String>>,
}

impl Record {
    /// Build a record for 1-based data row `row`.
    ///
    /// `values` is padded with `None` or truncated to the column count.
    pub fn new(row: usize, columns: Columns, mut values: Vec<Option<String>>) -> Self {
        values.resize(columns.len(), None);
        Self {
            row,
            columns,
            values,
        }
    }

    /// Build a record with every cell present.
    pub fn from_cells<I, S>(row: usize, columns: Columns, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = cells.into_iter().map(|c| Some(c.into())).collect();
        Self::new(row, columns, values)
    }

    /// 1-based data row number in the source file (the header is not counted).
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    /// Is `key` one of this record's columns?
    pub fn has_column(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Cell value for `key`, or `None` if the column is unknown or the cell
    /// is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index_of(key).and_then(|i| self.values[i].as_deref())
    }

    /// Return a copy of this record with `key` set to `value`.
    ///
    /// The receiver is left untouched. An unknown `key` returns an unchanged
    /// copy, since records in a set must keep identical key sets.
    pub fn with_value(&self, key: &str, value: impl Into<String>) -> Record {
        let mut values = self.values.clone();
        if let Some(i) = self.index_of(key) {
            values[i] = Some(value.into());
        }
        Record {
            row: self.row,
            columns: Arc::clone(&self.columns),
            values,
        }
    }

    /// Iterate `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// An ordered collection of records sharing one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    columns: Columns,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(columns: Columns, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Build a set from a header and fully populated rows.
    pub fn from_rows<H, R, S>(header: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Columns = header.into_iter().map(Into::into).collect();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Record::from_cells(i + 1, Arc::clone(&columns), cells))
            .collect();
        Self { columns, records }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the records, keeping the header.
    pub fn with_records(self, records: Vec<Record>) -> Self {
        Self {
            columns: self.columns,
            records,
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
