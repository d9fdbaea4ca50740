//! Business rule validation for journal entries.
//!
//! These checks are pure; the composer runs them in order around its store lookups.

use gl_shared::types::amount::{is_valid_line_amount, LEDGER_MAX_INTEGER_DIGITS, LEDGER_SCALE};

use super::error::LedgerError;
use super::types::{EntryTotals, JournalLineInput, PostJournalEntry};

/// Maximum length of an entry reference.
pub const MAX_REFERENCE_LEN: usize = 64;
/// Maximum length of an entry description.
pub const MAX_DESCRIPTION_LEN: usize = 255;
/// Minimum number of lines in an entry.
pub const MIN_LINES: usize = 2;

/// Checks header fields and line shape: reference, description, line count, amounts.
///
/// # Errors
///
/// Returns `InvalidEntryStructure` describing the first violation.
pub fn validate_structure(input: &PostJournalEntry) -> Result<(), LedgerError> {
    if input.lines.len() < MIN_LINES {
        return Err(LedgerError::InvalidEntryStructure(format!(
            "a journal entry needs at least {MIN_LINES} lines, got {}",
            input.lines.len()
        )));
    }

    check_text("reference", &input.reference, MAX_REFERENCE_LEN)
        .map_err(LedgerError::InvalidEntryStructure)?;
    check_text("description", &input.description, MAX_DESCRIPTION_LEN)
        .map_err(LedgerError::InvalidEntryStructure)?;

    for (index, line) in input.lines.iter().enumerate() {
        if line.account_code.trim().is_empty() {
            return Err(LedgerError::InvalidEntryStructure(format!(
                "line {} has no account code",
                index + 1
            )));
        }
        if !is_valid_line_amount(line.amount) {
            return Err(LedgerError::InvalidEntryStructure(format!(
                "line {} amount {} must be positive with at most {LEDGER_MAX_INTEGER_DIGITS} integer \
                 digits and {LEDGER_SCALE} decimal places",
                index + 1,
                line.amount
            )));
        }
    }

    Ok(())
}

/// Sums the lines and requires debits to equal credits exactly.
///
/// # Errors
///
/// Returns `InvalidEntryStructure` if a total overflows, or `UnbalancedEntry` with
/// both totals when they differ.
pub fn check_balance(lines: &[JournalLineInput]) -> Result<EntryTotals, LedgerError> {
    let totals = EntryTotals::from_lines(lines.iter().map(|l| (l.entry_type, l.amount)))?;

    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}

/// Checks a required, length-limited text field. Returns the reason on failure.
pub(crate) fn check_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(format!("{field} exceeds {max_len} characters ({len})"));
    }
    Ok(())
}
