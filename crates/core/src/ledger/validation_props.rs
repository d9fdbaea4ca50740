//! Property-based tests for journal entry validation rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryType, JournalLineInput, PostJournalEntry};
use super::validation::{check_balance, validate_structure};

/// Strategy to generate a valid line amount (0.0001 to 1,000,000.0000).
fn line_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Strategy to generate an entry type.
fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

/// Splits `total` into `parts.len()` positive pieces that sum to it exactly.
fn split(total: Decimal, parts: &[u8]) -> Vec<Decimal> {
    let unit = Decimal::new(1, 4);
    let mut remaining = total;
    let mut pieces = Vec::with_capacity(parts.len());
    for (i, &weight) in parts.iter().enumerate() {
        if i + 1 == parts.len() {
            pieces.push(remaining);
            break;
        }
        let slots = Decimal::from(parts.len() - i - 1);
        let max_piece = remaining - unit * slots;
        let piece = ((max_piece * Decimal::from(weight)) / Decimal::from(255u8))
            .round_dp(4)
            .max(unit)
            .min(max_piece);
        pieces.push(piece);
        remaining -= piece;
    }
    pieces
}

fn entry(lines: Vec<JournalLineInput>) -> PostJournalEntry {
    PostJournalEntry {
        reference: "PROP-1".to_string(),
        description: "property".to_string(),
        value_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Lines split from one total on each side always balance exactly.
    #[test]
    fn prop_split_lines_balance(
        total in (100i64..10_000_000_000i64).prop_map(|u| Decimal::new(u, 4)),
        debit_weights in prop::collection::vec(any::<u8>(), 1..6),
        credit_weights in prop::collection::vec(any::<u8>(), 1..6),
    ) {
        let mut lines: Vec<JournalLineInput> = split(total, &debit_weights)
            .into_iter()
            .map(|a| JournalLineInput::debit("1000", a))
            .collect();
        lines.extend(
            split(total, &credit_weights)
                .into_iter()
                .map(|a| JournalLineInput::credit("2000", a)),
        );

        prop_assert!(validate_structure(&entry(lines.clone())).is_ok());
        let totals = check_balance(&lines).unwrap();
        prop_assert_eq!(totals.total_debit, total);
        prop_assert_eq!(totals.total_credit, total);
    }

    /// Any nonzero difference between sides is rejected with both totals.
    #[test]
    fn prop_any_difference_rejected(
        amount in line_amount(),
        delta in line_amount(),
        side in entry_type_strategy(),
    ) {
        let lines = vec![
            JournalLineInput { account_code: "1000".into(), entry_type: side, amount: amount + delta },
            JournalLineInput { account_code: "2000".into(), entry_type: side.opposite(), amount },
        ];

        match check_balance(&lines) {
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                prop_assert_eq!((debit - credit).abs(), delta);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// Non-positive amounts are structural errors regardless of balance.
    #[test]
    fn prop_non_positive_amount_rejected(
        cents in 0i64..1_000_000i64,
        side in entry_type_strategy(),
    ) {
        let bad = Decimal::new(-cents, 2);
        let lines = vec![
            JournalLineInput { account_code: "1000".into(), entry_type: side, amount: bad },
            JournalLineInput { account_code: "2000".into(), entry_type: side.opposite(), amount: bad },
        ];
        let is_structure_error = matches!(
            validate_structure(&entry(lines)),
            Err(LedgerError::InvalidEntryStructure(_))
        );
        prop_assert!(is_structure_error);
    }
}
