// Core data model - Transactions and the allocation ledger
// Fixed-shape types throughout; required fields are validated once at
// ingestion, not per access.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical display format for all dates in the ledger
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// TAGS
// ============================================================================

/// Derived classification of a transaction by amount sign.
///
/// `Donation` iff the amount is strictly positive; everything else -
/// negative, zero, even an unparsable amount - is `Charity`. Zero-amount
/// rows therefore carry a Charity tag while belonging to neither the
/// credit nor the debit partition. That edge case is inherited behavior
/// and is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Donation,
    Charity,
}

impl Tag {
    pub fn from_amount(amount: Option<f64>) -> Self {
        match amount {
            Some(a) if a > 0.0 => Tag::Donation,
            _ => Tag::Charity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tag::Donation => "Donation",
            Tag::Charity => "Charity",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// TRANSACTION (input side)
// ============================================================================

/// A normalized transaction, immutable after normalization.
///
/// `date` and `amount` are `None` when the raw field failed to parse; a
/// row with a null amount satisfies neither `> 0` nor `< 0` and is
/// excluded from both partitions by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within its input set. The engine relies on this and does
    /// not verify it.
    pub id: String,
    pub date: Option<NaiveDateTime>,
    pub amount: Option<f64>,
    /// Opaque correlation string carried through to the ledger.
    pub uuid: String,
    pub tag: Tag,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        matches!(self.amount, Some(a) if a > 0.0)
    }

    pub fn is_debit(&self) -> bool {
        matches!(self.amount, Some(a) if a < 0.0)
    }

    /// Date rendered in the canonical ledger format, `None` preserved.
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format(DATE_FORMAT).to_string())
    }
}

// ============================================================================
// ALLOCATION RECORD (output side)
// ============================================================================

/// One credit/debit pairing in the allocation trail.
///
/// Dates are stored pre-formatted in the canonical ledger format so the
/// record serializes identically to JSON and CSV under the
/// `Credit_Date`-style column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    #[serde(rename = "Credit_Date")]
    pub credit_date: Option<String>,

    #[serde(rename = "Credit_ID")]
    pub credit_id: String,

    #[serde(rename = "Credit_UUID")]
    pub credit_uuid: String,

    #[serde(rename = "Credit_Tag")]
    pub credit_tag: Tag,

    #[serde(rename = "Credit_Amount")]
    pub credit_amount: f64,

    #[serde(rename = "Used_From_Credit")]
    pub used_from_credit: f64,

    #[serde(rename = "Credit_Remaining")]
    pub credit_remaining: f64,

    #[serde(rename = "Debit_Date")]
    pub debit_date: Option<String>,

    #[serde(rename = "Debit_ID")]
    pub debit_id: String,

    #[serde(rename = "Debit_UUID")]
    pub debit_uuid: String,

    #[serde(rename = "Debit_Tag")]
    pub debit_tag: Tag,

    /// Absolute value of the original (negative) debit amount.
    #[serde(rename = "Debit_Amount")]
    pub debit_amount: f64,
}

/// The ordered allocation trail produced by one reconciliation run.
pub type Ledger = Vec<AllocationRecord>;

/// Stringified amount used for option lists and string-fallback matching.
/// Must stay consistent between the two, so it lives here.
pub fn amount_string(amount: f64) -> String {
    amount.to_string()
}
