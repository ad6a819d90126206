// CSV ingestion - raw row reading plus the one-time schema check
// The only fatal error in the pipeline lives here: missing required
// columns fail the whole ingest, per-row value problems never do.

use crate::normalize::RawRow;
use std::io;
use thiserror::Error;

/// Columns every input file must carry, in no particular order.
pub const REQUIRED_COLUMNS: &[&str] = &["ID", "Date", "Amount", "UUID"];

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The header row lacks one or more required columns. Fatal to the
    /// ingest call; no partial row set is produced.
    #[error("required columns missing from input: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The input is not readable as CSV at all.
    #[error("malformed csv input: {0}")]
    Malformed(#[from] csv::Error),
}

/// Read raw rows from CSV input, verifying the header first.
///
/// Extra columns are ignored. Row values are kept as text; coercion is
/// the normalizer's job.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<RawRow>, SchemaError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns { missing });
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: RawRow = record?;
        rows.push(row);
    }
    Ok(rows)
}

/// Convenience for in-memory buffers (uploads arrive as bytes).
pub fn read_rows_from_bytes(bytes: &[u8]) -> Result<Vec<RawRow>, SchemaError> {
    read_rows(bytes)
}
