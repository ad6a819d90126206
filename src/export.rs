// Export Adapter - render allocation rows to downloadable CSV bytes
// The caller decides which rows (complete ledger or a filtered subset).

use crate::model::AllocationRecord;
use anyhow::Result;

/// Column order of exported files, matching the record's serialized
/// field names.
pub const EXPORT_COLUMNS: &[&str] = &[
    "Credit_Date",
    "Credit_ID",
    "Credit_UUID",
    "Credit_Tag",
    "Credit_Amount",
    "Used_From_Credit",
    "Credit_Remaining",
    "Debit_Date",
    "Debit_ID",
    "Debit_UUID",
    "Debit_Tag",
    "Debit_Amount",
];

/// Serialize rows to CSV with a header, in the order given.
///
/// An empty row set still produces the header line, so a download of a
/// fully-filtered-out view is a valid (empty) table rather than a
/// zero-byte file.
pub fn export_rows(rows: &[AllocationRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if rows.is_empty() {
        writer.write_record(EXPORT_COLUMNS)?;
    } else {
        for row in rows {
            writer.serialize(row)?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv buffer flush failed: {}", e))
}
