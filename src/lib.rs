// Recon Ledger - Core Library
// FIFO reconciliation of signed transactions plus the cascading
// filter/query layer over the resulting allocation trail.
// Exposes all modules for use in the CLI, API server, and tests.

pub mod allocation;
pub mod export;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use allocation::reconcile;
pub use export::{export_rows, EXPORT_COLUMNS};
pub use ingest::{read_rows, read_rows_from_bytes, SchemaError, REQUIRED_COLUMNS};
pub use model::{amount_string, AllocationRecord, Ledger, Tag, Transaction, DATE_FORMAT};
pub use normalize::{chronological, normalize, normalize_row, parse_amount, parse_date, RawRow};
pub use query::{
    ledger_options, ledger_rows, options_query, rows_query, FilterCriteria, FilterOptions,
};
pub use store::{new_session_id, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full pipeline over raw CSV bytes: ingest, normalize, reconcile.
/// The only failure mode is the ingest-time schema check.
pub fn reconcile_csv(bytes: &[u8]) -> Result<Ledger, SchemaError> {
    let rows = ingest::read_rows_from_bytes(bytes)?;
    let transactions = normalize::normalize(&rows);
    Ok(allocation::reconcile(&transactions))
}
