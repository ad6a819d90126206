// Allocation Engine - deterministic FIFO matching of debits to credits
//
// Debits are satisfied oldest-credit-first, in chronological debit order.
// Every (credit, debit, used) pairing becomes one AllocationRecord, so
// the ledger is a full audit trail of where each debit's funds came from.

use crate::model::{AllocationRecord, Ledger, Transaction};
use crate::normalize::chronological;
use std::collections::HashMap;

/// Run one reconciliation pass over a normalized transaction set.
///
/// Pure and deterministic: the same input always yields the same ledger.
/// Sorting is ascending `(date, id)` on both partitions, null dates
/// last, so ties and undated rows cannot reorder between runs.
///
/// A debit that exhausts every credit with outstanding amount left over
/// produces no record for the remainder and no error; the leftover is
/// simply absent from the ledger. Matching the same property on the
/// credit side, a credit larger than total debit demand keeps its
/// unused remainder only in the `Credit_Remaining` column of its last
/// record.
///
/// Worst case is O(debits x credits) - one large debit scanning many
/// exhausted credits. Acceptable at expected set sizes; reducing it
/// would require reordering allocations, so it stays.
pub fn reconcile(transactions: &[Transaction]) -> Ledger {
    let mut credits: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_credit()).collect();
    let mut debits: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_debit()).collect();
    credits.sort_by(|a, b| chronological(a, b));
    debits.sort_by(|a, b| chronological(a, b));

    // Mutable remainder per credit, keyed by id. Ids are assumed unique
    // across the input; the engine does not verify that.
    let mut remaining: HashMap<&str, f64> = credits
        .iter()
        .map(|c| (c.id.as_str(), c.amount.unwrap_or_default()))
        .collect();

    let mut records: Ledger = Vec::new();

    for debit in &debits {
        let debit_amount = debit.amount.unwrap_or_default().abs();
        let mut outstanding = debit_amount;

        for credit in &credits {
            let Some(credit_remaining) = remaining.get_mut(credit.id.as_str()) else {
                continue;
            };
            if *credit_remaining <= 0.0 {
                continue;
            }

            let used = outstanding.min(*credit_remaining);
            *credit_remaining -= used;
            outstanding -= used;

            records.push(AllocationRecord {
                credit_date: credit.date_string(),
                credit_id: credit.id.clone(),
                credit_uuid: credit.uuid.clone(),
                credit_tag: credit.tag,
                credit_amount: credit.amount.unwrap_or_default(),
                used_from_credit: used,
                credit_remaining: *credit_remaining,
                debit_date: debit.date_string(),
                debit_id: debit.id.clone(),
                debit_uuid: debit.uuid.clone(),
                debit_tag: debit.tag,
                debit_amount,
            });

            if outstanding <= 0.0 {
                break;
            }
        }
        // Any outstanding remainder past the last credit is not recorded.
    }

    records
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;
    use chrono::NaiveDate;

    fn tx(id: &str, date: &str, amount: f64) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        Transaction {
            id: id.to_string(),
            date,
            amount: Some(amount),
            uuid: format!("uuid-{}", id),
            tag: Tag::from_amount(Some(amount)),
        }
    }

    fn tx_null_amount(id: &str, date: &str) -> Transaction {
        let mut t = tx(id, date, 0.0);
        t.amount = None;
        t.tag = Tag::from_amount(None);
        t
    }

    #[test]
    fn test_debit_spanning_two_credits() {
        // Scenario: one debit larger than the oldest credit spills into
        // the next credit in date order.
        let transactions = vec![
            tx("C1", "2024-01-01", 100.0),
            tx("C2", "2024-01-02", 50.0),
            tx("D1", "2024-01-03", -120.0),
        ];

        let ledger = reconcile(&transactions);
        assert_eq!(ledger.len(), 2);

        assert_eq!(ledger[0].credit_id, "C1");
        assert_eq!(ledger[0].used_from_credit, 100.0);
        assert_eq!(ledger[0].credit_remaining, 0.0);
        assert_eq!(ledger[0].debit_id, "D1");
        assert_eq!(ledger[0].debit_amount, 120.0);

        assert_eq!(ledger[1].credit_id, "C2");
        assert_eq!(ledger[1].used_from_credit, 20.0);
        assert_eq!(ledger[1].credit_remaining, 30.0);

        // D1 fully satisfied: used sums to the debit amount
        let used: f64 = ledger.iter().map(|r| r.used_from_credit).sum();
        assert_eq!(used, 120.0);
    }

    #[test]
    fn test_unmatched_debit_remainder_is_dropped() {
        // Total credit supply is insufficient; the leftover 70 appears
        // nowhere in the ledger and no error is raised.
        let transactions = vec![
            tx("C1", "2024-01-01", 50.0),
            tx("D1", "2024-01-02", -120.0),
        ];

        let ledger = reconcile(&transactions);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].credit_id, "C1");
        assert_eq!(ledger[0].used_from_credit, 50.0);
        assert_eq!(ledger[0].credit_remaining, 0.0);
        assert_eq!(ledger[0].debit_amount, 120.0);

        let used: f64 = ledger.iter().map(|r| r.used_from_credit).sum();
        assert_eq!(used, 50.0);
    }

    #[test]
    fn test_null_and_zero_amounts_never_allocate() {
        let transactions = vec![
            tx_null_amount("X1", "2024-01-01"),
            tx("Z1", "2024-01-01", 0.0),
            tx("C1", "2024-01-02", 30.0),
            tx("D1", "2024-01-03", -30.0),
        ];

        let ledger = reconcile(&transactions);
        assert_eq!(ledger.len(), 1);
        for record in &ledger {
            assert_ne!(record.credit_id, "X1");
            assert_ne!(record.debit_id, "X1");
            assert_ne!(record.credit_id, "Z1");
            assert_ne!(record.debit_id, "Z1");
        }
    }

    #[test]
    fn test_tags_on_records() {
        let ledger = reconcile(&[
            tx("C1", "2024-01-01", 10.0),
            tx("D1", "2024-01-02", -10.0),
        ]);
        assert_eq!(ledger[0].credit_tag, Tag::Donation);
        assert_eq!(ledger[0].debit_tag, Tag::Charity);
    }

    #[test]
    fn test_exhausted_credits_are_skipped() {
        // D2 must skip C1 (already drained by D1) and land on C2.
        let transactions = vec![
            tx("C1", "2024-01-01", 40.0),
            tx("C2", "2024-01-02", 40.0),
            tx("D1", "2024-01-03", -40.0),
            tx("D2", "2024-01-04", -10.0),
        ];

        let ledger = reconcile(&transactions);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].debit_id, "D1");
        assert_eq!(ledger[0].credit_id, "C1");
        assert_eq!(ledger[1].debit_id, "D2");
        assert_eq!(ledger[1].credit_id, "C2");
        assert_eq!(ledger[1].credit_remaining, 30.0);
    }

    #[test]
    fn test_date_ties_and_null_dates_order_deterministically() {
        // C1/C2 share a date: id breaks the tie. C3 has no date and is
        // consumed last.
        let mut undated = tx("C3", "2024-01-01", 10.0);
        undated.date = None;
        let transactions = vec![
            tx("C2", "2024-01-01", 10.0),
            tx("C1", "2024-01-01", 10.0),
            undated,
            tx("D1", "2024-01-05", -30.0),
        ];

        let ledger = reconcile(&transactions);
        let credit_ids: Vec<&str> = ledger.iter().map(|r| r.credit_id.as_str()).collect();
        assert_eq!(credit_ids, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let transactions = vec![
            tx("C1", "2024-01-01", 75.0),
            tx("C2", "2024-01-02", 25.0),
            tx("D1", "2024-01-03", -50.0),
            tx("D2", "2024-01-04", -50.0),
        ];
        assert_eq!(reconcile(&transactions), reconcile(&transactions));
    }

    #[test]
    fn test_empty_partitions_yield_empty_ledger() {
        assert!(reconcile(&[]).is_empty());
        assert!(reconcile(&[tx("C1", "2024-01-01", 10.0)]).is_empty());
        assert!(reconcile(&[tx("D1", "2024-01-01", -10.0)]).is_empty());
    }

    #[test]
    fn test_conservation_per_credit_and_per_debit() {
        let transactions = vec![
            tx("C1", "2024-01-01", 30.0),
            tx("C2", "2024-01-02", 45.0),
            tx("C3", "2024-01-03", 5.0),
            tx("D1", "2024-01-04", -20.0),
            tx("D2", "2024-01-05", -40.0),
            tx("D3", "2024-01-06", -100.0),
        ];
        let ledger = reconcile(&transactions);

        let mut used_per_credit: HashMap<&str, f64> = HashMap::new();
        let mut used_per_debit: HashMap<&str, f64> = HashMap::new();
        for record in &ledger {
            assert!(record.used_from_credit > 0.0);
            assert!(record.used_from_credit <= record.credit_amount);
            *used_per_credit.entry(record.credit_id.as_str()).or_default() +=
                record.used_from_credit;
            *used_per_debit.entry(record.debit_id.as_str()).or_default() +=
                record.used_from_credit;
        }

        for t in transactions.iter().filter(|t| t.is_credit()) {
            let used = used_per_credit.get(t.id.as_str()).copied().unwrap_or(0.0);
            assert!(used <= t.amount.unwrap());
        }
        for t in transactions.iter().filter(|t| t.is_debit()) {
            let used = used_per_debit.get(t.id.as_str()).copied().unwrap_or(0.0);
            assert!(used <= t.amount.unwrap().abs());
        }
    }

    #[test]
    fn test_records_ordered_by_debit_then_credit() {
        let transactions = vec![
            tx("C1", "2024-01-01", 10.0),
            tx("C2", "2024-01-02", 10.0),
            tx("C3", "2024-01-03", 10.0),
            tx("D1", "2024-01-04", -15.0),
            tx("D2", "2024-01-05", -15.0),
        ];
        let ledger = reconcile(&transactions);

        let pairs: Vec<(&str, &str)> = ledger
            .iter()
            .map(|r| (r.debit_id.as_str(), r.credit_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("D1", "C1"), ("D1", "C2"), ("D2", "C2"), ("D2", "C3")]
        );
    }
}
