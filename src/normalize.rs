// Normalizer - raw rows to canonical typed transactions
// Pure transform: per-row parse failures become None fields, never errors.

use crate::model::{Tag, Transaction};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// RAW ROW
// ============================================================================

/// One row as it arrives from the tabular source, all fields still text.
/// Field names mirror the required input columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Amount")]
    pub amount: String,

    #[serde(rename = "UUID")]
    pub uuid: String,
}

// ============================================================================
// FIELD COERCION
// ============================================================================

/// Datetime shapes accepted before giving up on a date field.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only shapes, promoted to midnight. Month-first wins the
/// slash-separated ambiguity, matching the source data's convention.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parse a raw date field. Returns `None` on any shape we don't accept.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse a raw amount field. Returns `None` on any non-numeric input;
/// such a row then satisfies neither `> 0` nor `< 0` and is excluded
/// from both allocation partitions.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|a| a.is_finite())
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize a single raw row into a typed transaction.
pub fn normalize_row(row: &RawRow) -> Transaction {
    let amount = parse_amount(&row.amount);
    Transaction {
        id: row.id.trim().to_string(),
        date: parse_date(&row.date),
        amount,
        uuid: row.uuid.trim().to_string(),
        tag: Tag::from_amount(amount),
    }
}

/// Normalize a full row set. Order is preserved; the allocation engine
/// applies its own chronological sort afterwards.
pub fn normalize(rows: &[RawRow]) -> Vec<Transaction> {
    rows.iter().map(normalize_row).collect()
}

/// Total chronological order over transactions: ascending by date, ties
/// (and null-vs-null) broken by id for determinism. Null dates sort
/// last by policy, so rows with unparsable dates never displace dated
/// rows in FIFO matching.
pub fn chronological(a: &Transaction, b: &Transaction) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}
