//! Offsetting entries for corrections.
//!
//! Posted entries are never edited. A correction is a new entry whose lines are
//! the original's with debits and credits swapped.

use chrono::NaiveDate;

use super::types::{JournalEntry, JournalLineInput, PostJournalEntry};

/// Builds the description used when the caller does not supply one.
#[must_use]
pub fn default_reversal_description(original_reference: &str) -> String {
    format!("Reversal of {original_reference}")
}

/// Builds the posting input that offsets `original`.
///
/// For each original line, in order:
/// - Debits become credits
/// - Credits become debits
/// - Account and amount are preserved
#[must_use]
pub fn reversing_entry(
    original: &JournalEntry,
    reversal_reference: &str,
    value_date: NaiveDate,
    description: Option<&str>,
) -> PostJournalEntry {
    let lines = original
        .lines
        .iter()
        .map(|line| JournalLineInput {
            account_code: line.account_code.clone(),
            entry_type: line.entry_type.opposite(),
            amount: line.amount,
        })
        .collect();

    PostJournalEntry {
        reference: reversal_reference.to_string(),
        description: description.map_or_else(
            || default_reversal_description(&original.reference),
            ToString::to_string,
        ),
        value_date,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{EntryType, JournalLine};
    use chrono::Utc;
    use gl_shared::types::{JournalEntryId, JournalLineId, LedgerAccountId};
    use rust_decimal_macros::dec;

    fn original() -> JournalEntry {
        let id = JournalEntryId::new();
        let line = |no, code: &str, entry_type, amount| JournalLine {
            id: JournalLineId::new(),
            entry_id: id,
            line_no: no,
            account_id: LedgerAccountId::new(),
            account_code: code.to_string(),
            entry_type,
            amount,
        };
        JournalEntry {
            id,
            reference: "FEE-42".to_string(),
            description: "Monthly fee".to_string(),
            value_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            created_at: Utc::now(),
            lines: vec![
                line(1, "1000", EntryType::Debit, dec!(6.00)),
                line(2, "4000", EntryType::Credit, dec!(6.00)),
            ],
        }
    }

    #[test]
    fn test_swaps_every_line() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let reversal = reversing_entry(&original(), "FEE-42-REV", date, None);

        assert_eq!(reversal.reference, "FEE-42-REV");
        assert_eq!(reversal.description, "Reversal of FEE-42");
        assert_eq!(reversal.value_date, date);
        assert_eq!(
            reversal.lines,
            vec![
                JournalLineInput::credit("1000", dec!(6.00)),
                JournalLineInput::debit("4000", dec!(6.00)),
            ]
        );
    }

    #[test]
    fn test_custom_description() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let reversal = reversing_entry(&original(), "R", date, Some("Fee waived"));
        assert_eq!(reversal.description, "Fee waived");
    }
}
