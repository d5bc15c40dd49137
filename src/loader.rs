//! Record loader.
//!
//! The whole input file is read before any parsing starts, so downstream
//! stages only ever see a complete [`RecordSet`].

use std::path::Path;
use std::sync::Arc;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::RemapError;
use crate::record::{Columns, Record, RecordSet};

/// Read and parse the delimited file at `path`.
///
/// Fails with [`RemapError::Read`] if the file is missing or unreadable.
pub async fn load_records(path: &Path, delimiter: u8) -> Result<RecordSet, RemapError> {
    info!("Preparing to parse CSV file {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|source| RemapError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let set = parse_records(&bytes, delimiter)?;
    info!("Loaded {} records with {} columns", set.len(), set.columns().len());
    Ok(set)
}

/// Parse delimited text already in memory.
///
/// The first line is the header. Short rows are null-filled; fields past the
/// header width are dropped.
pub fn parse_records(bytes: &[u8], delimiter: u8) -> Result<RecordSet, RemapError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Columns = reader.headers()?.iter().map(str::to_owned).collect();
    let width = columns.len();

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let n = i + 1;
        if row.len() > width {
            debug!("Row {n} has {} fields, header has {width}; extra fields dropped", row.len());
        }
        let values = (0..width).map(|c| row.get(c).map(str::to_owned)).collect();
        records.push(Record::new(n, Arc::clone(&columns), values));
    }

    Ok(RecordSet::new(columns, records))
}
