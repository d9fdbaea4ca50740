//! Balance, reconciliation and trial balance results.
//!
//! Balances are always derived from posted lines at query time; nothing here is
//! stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{AccountType, EntryType, LineTotals, PeriodTotals};

/// Debit/credit totals of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account code.
    pub code: String,
    /// Sum of debit lines.
    pub total_debit: Decimal,
    /// Sum of credit lines.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub net_balance: Decimal,
}

impl AccountBalance {
    /// Builds a balance from aggregated line totals.
    #[must_use]
    pub fn from_totals(code: impl Into<String>, totals: LineTotals) -> Self {
        Self {
            code: code.into(),
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            net_balance: totals.total_debit - totals.total_credit,
        }
    }
}

/// Full-ledger debit/credit check over a value-date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Inclusive start.
    pub from_date: NaiveDate,
    /// Inclusive end.
    pub to_date: NaiveDate,
    /// Sum of debit lines in range.
    pub total_debit: Decimal,
    /// Sum of credit lines in range.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub balanced: bool,
    /// Entries whose value date falls in range.
    pub entry_count: u64,
}

impl Reconciliation {
    /// Builds a reconciliation from period totals.
    #[must_use]
    pub fn new(from_date: NaiveDate, to_date: NaiveDate, totals: PeriodTotals) -> Self {
        Self {
            from_date,
            to_date,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            balanced: totals.total_debit == totals.total_credit,
            entry_count: totals.entry_count,
        }
    }
}

/// Returns the balance on the account's normal side.
///
/// - Asset/Expense: debit - credit (debit-normal)
/// - Liability/Equity/Income: credit - debit (credit-normal)
#[must_use]
pub fn natural_balance(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    match account_type.normal_side() {
        EntryType::Debit => debit - credit,
        EntryType::Credit => credit - debit,
    }
}

/// One account row of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account class.
    pub account_type: AccountType,
    /// Sum of debit lines.
    pub total_debit: Decimal,
    /// Sum of credit lines.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub net_balance: Decimal,
    /// Balance on the account's normal side.
    pub natural_balance: Decimal,
}

/// Every account's totals plus grand totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Rows ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of all debit lines.
    pub total_debit: Decimal,
    /// Sum of all credit lines.
    pub total_credit: Decimal,
    /// Whether grand totals are equal.
    pub balanced: bool,
}

impl TrialBalance {
    /// Sums the rows into grand totals.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if a grand total overflows.
    pub fn from_rows(rows: Vec<TrialBalanceRow>) -> Result<Self, LedgerError> {
        let sum = |side: fn(&TrialBalanceRow) -> Decimal| {
            rows.iter()
                .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(side(row)))
                .ok_or_else(|| LedgerError::Internal("trial balance totals overflow".to_string()))
        };
        let total_debit = sum(|r| r.total_debit)?;
        let total_credit = sum(|r| r.total_credit)?;
        Ok(Self {
            rows,
            total_debit,
            total_credit,
            balanced: total_debit == total_credit,
        })
    }
}
