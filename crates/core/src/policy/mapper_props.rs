//! Property-based tests for policy line synthesis.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::mapper::synthesize_lines;
use super::standard::PostingPolicy;
use super::types::{OperationType, PolicyPostingRequest};
use crate::ledger::validation::check_balance;

/// Strategy to generate a request amount (0.01 to 10,000,000.00).
fn request_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn operation_strategy() -> impl Strategy<Value = OperationType> {
    prop::sample::select(OperationType::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every standard rule yields two opposite lines that balance at the request amount.
    #[test]
    fn prop_policy_lines_balance(
        operation in operation_strategy(),
        amount in request_amount(),
        source_ref in "[A-Z]{3}-[0-9]{6}",
        destination_ref in proptest::option::of("[A-Z]{3}-[0-9]{6}"),
    ) {
        let policy = PostingPolicy::standard();
        let rule = policy.rule(operation).unwrap();
        let request = PolicyPostingRequest {
            reference: "PROP-1".to_string(),
            description: "property".to_string(),
            value_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            operation_type: operation,
            amount,
            source_account_ref: source_ref,
            destination_account_ref: destination_ref,
        };
        prop_assert!(request.validate().is_ok());

        let lines = synthesize_lines(rule, &request);
        prop_assert_eq!(lines[0].entry_type, rule.source_side);
        prop_assert_eq!(lines[1].entry_type, rule.source_side.opposite());
        prop_assert_eq!(&lines[0].account_code, &rule.source.account);
        prop_assert_eq!(&lines[1].account_code, &rule.destination.account);

        let totals = check_balance(&lines).unwrap();
        prop_assert_eq!(totals.total_debit, amount);
        prop_assert_eq!(totals.total_credit, amount);
    }
}
