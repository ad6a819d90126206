// Filter/Query Engine - cascading option sets and filtered row views
//
// Both query shapes share one equality semantics over the credit side
// of the ledger. Queries are pure reads; a session without a ledger
// answers with empty results rather than an error.

use crate::model::{amount_string, AllocationRecord, Ledger};
use crate::store::SessionStore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// CRITERIA
// ============================================================================

/// Credit-side filter criteria. Every field is optional; an unset or
/// empty-string field imposes no constraint (clients send empty strings
/// for untouched inputs).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub credit_date: Option<String>,

    #[serde(default)]
    pub credit_uuid: Option<String>,

    #[serde(default)]
    pub credit_amount: Option<String>,
}

impl FilterCriteria {
    fn active(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|s| !s.is_empty())
    }

    /// Exact-equality match against a record's credit side.
    ///
    /// The amount criterion is parsed numerically first; if that fails
    /// it falls back to string comparison against the stringified
    /// stored amount. The dual mode is what tolerates client-sent
    /// numbers arriving as text.
    pub fn matches(&self, record: &AllocationRecord) -> bool {
        if let Some(want) = Self::active(&self.credit_date) {
            match &record.credit_date {
                Some(have) if have == want => {}
                _ => return false,
            }
        }

        if let Some(want) = Self::active(&self.credit_uuid) {
            if record.credit_uuid != want {
                return false;
            }
        }

        if let Some(want) = Self::active(&self.credit_amount) {
            let matched = match want.parse::<f64>() {
                Ok(value) => record.credit_amount == value,
                Err(_) => amount_string(record.credit_amount) == want,
            };
            if !matched {
                return false;
            }
        }

        true
    }
}

// ============================================================================
// OPTION QUERY
// ============================================================================

/// Per-field distinct value lists for the rows still matching the
/// current criteria; feeds the cascading suggestion inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub dates: Vec<String>,
    pub uuids: Vec<String>,
    pub amounts: Vec<String>,
}

/// Compute the mutually-consistent option sets over one ledger.
///
/// Dates and uuids sort lexically ascending (the canonical date format
/// makes lexical and chronological order agree); amounts sort
/// numerically before stringification. Null dates are excluded from
/// the suggestion set.
pub fn ledger_options(ledger: &Ledger, criteria: &FilterCriteria) -> FilterOptions {
    let rows: Vec<&AllocationRecord> = ledger
        .iter()
        .filter(|r| r.credit_amount > 0.0 && criteria.matches(r))
        .collect();

    let mut dates: Vec<String> = rows
        .iter()
        .filter_map(|r| r.credit_date.clone())
        .collect();
    dates.sort();
    dates.dedup();

    let mut uuids: Vec<String> = rows.iter().map(|r| r.credit_uuid.clone()).collect();
    uuids.sort();
    uuids.dedup();

    let mut amounts: Vec<f64> = rows.iter().map(|r| r.credit_amount).collect();
    amounts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    amounts.dedup();
    let amounts = amounts.into_iter().map(amount_string).collect();

    FilterOptions { dates, uuids, amounts }
}

// ============================================================================
// ROW QUERY
// ============================================================================

/// Full records matching the criteria, in ledger order.
pub fn ledger_rows(ledger: &Ledger, criteria: &FilterCriteria) -> Vec<AllocationRecord> {
    ledger
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

// ============================================================================
// SESSION-LEVEL QUERIES
// ============================================================================

/// Option query against a stored session ledger. An unknown session
/// yields empty option lists.
pub fn options_query(
    store: &SessionStore,
    session_id: &str,
    criteria: &FilterCriteria,
) -> FilterOptions {
    match store.get(session_id) {
        Some(ledger) => ledger_options(&ledger, criteria),
        None => FilterOptions::default(),
    }
}

/// Row query against a stored session ledger. An unknown session
/// yields an empty row list.
pub fn rows_query(
    store: &SessionStore,
    session_id: &str,
    criteria: &FilterCriteria,
) -> Vec<AllocationRecord> {
    match store.get(session_id) {
        Some(ledger) => ledger_rows(&ledger, criteria),
        None => Vec::new(),
    }
}
