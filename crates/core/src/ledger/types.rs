//! Ledger domain types.
//!
//! This module defines the accounts, journal entries and lines of the general
//! ledger, together with the input shapes used to create them.

use chrono::{DateTime, NaiveDate, Utc};
use gl_shared::types::{JournalEntryId, JournalLineId, LedgerAccountId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Entry type: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/income accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/income accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntryType {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Returns the stored representation (`DEBIT` / `CREDIT`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBIT" => Ok(Self::Debit),
            "CREDIT" => Ok(Self::Credit),
            _ => Err(format!("Unknown entry type: {s}")),
        }
    }
}

/// General-ledger account class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Resources owned (cash, clearing receivables).
    Asset,
    /// Obligations (customer deposits, clearing payables).
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Earned revenue (fees).
    Income,
    /// Costs incurred (interest paid).
    Expense,
}

impl AccountType {
    /// All account classes in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Returns the stored representation (`ASSET`, `LIABILITY`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Returns the side on which this account class normally carries its balance.
    ///
    /// Asset/Expense are debit-normal; Liability/Equity/Income are credit-normal.
    #[must_use]
    pub const fn normal_side(self) -> EntryType {
        match self {
            Self::Asset | Self::Expense => EntryType::Debit,
            Self::Liability | Self::Equity | Self::Income => EntryType::Credit,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// A named general-ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Internal identity.
    pub id: LedgerAccountId,
    /// Unique, stable code (e.g. "1000").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account class.
    pub account_type: AccountType,
    /// Inactive accounts reject new lines.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a ledger account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerAccount {
    /// Unique account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account class.
    pub account_type: AccountType,
}

impl NewLedgerAccount {
    /// Creates a new account input.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
        }
    }
}

/// One requested line of a journal entry, addressed by account code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Ledger account code.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Strictly positive amount, at most 4 fractional digits.
    pub amount: Decimal,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: EntryType::Debit,
            amount,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: EntryType::Credit,
            amount,
        }
    }
}

/// Input for posting a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostJournalEntry {
    /// Caller-supplied idempotency key.
    pub reference: String,
    /// Free-text description.
    pub description: String,
    /// Accounting date of the entry.
    pub value_date: NaiveDate,
    /// Ordered lines (at least 2).
    pub lines: Vec<JournalLineInput>,
}

/// A validated journal entry ready to be persisted.
///
/// Produced only by the composer; stores persist it as one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// Identity assigned before persistence.
    pub id: JournalEntryId,
    /// Unique reference.
    pub reference: String,
    /// Description.
    pub description: String,
    /// Accounting date.
    pub value_date: NaiveDate,
    /// Resolved lines in request order.
    pub lines: Vec<NewJournalLine>,
}

/// A resolved line of a [`NewJournalEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalLine {
    /// Identity assigned before persistence.
    pub id: JournalLineId,
    /// 1-based position within the entry.
    pub line_no: i32,
    /// Resolved account identity.
    pub account_id: LedgerAccountId,
    /// Account code the line was requested with.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Amount.
    pub amount: Decimal,
}

/// A persisted, immutable journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry identity.
    pub id: JournalEntryId,
    /// Unique reference.
    pub reference: String,
    /// Description.
    pub description: String,
    /// Accounting date.
    pub value_date: NaiveDate,
    /// When the entry was committed.
    pub created_at: DateTime<Utc>,
    /// Lines ordered by `line_no`.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Returns the debit/credit totals of this entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntryStructure` if a total overflows.
    pub fn totals(&self) -> Result<EntryTotals, LedgerError> {
        EntryTotals::from_lines(self.lines.iter().map(|l| (l.entry_type, l.amount)))
    }
}

/// A persisted journal line. Refers back to its entry by identifier only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line identity.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// 1-based position within the entry.
    pub line_no: i32,
    /// Account identity.
    pub account_id: LedgerAccountId,
    /// Account code.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Amount.
    pub amount: Decimal,
}

/// Debit and credit totals of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Sums `(direction, amount)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntryStructure` if either sum overflows.
    pub fn from_lines(
        lines: impl IntoIterator<Item = (EntryType, Decimal)>,
    ) -> Result<Self, LedgerError> {
        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;
        for (entry_type, amount) in lines {
            let total = match entry_type {
                EntryType::Debit => &mut debit,
                EntryType::Credit => &mut credit,
            };
            *total = total.checked_add(amount).ok_or_else(|| {
                LedgerError::InvalidEntryStructure(format!(
                    "{} total overflows",
                    entry_type.as_str().to_lowercase()
                ))
            })?;
        }
        Ok(Self::new(debit, credit))
    }

    /// Returns debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Aggregated line totals for one account, as returned by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
}

/// Aggregated totals over entries whose value date falls in a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Number of distinct entries in range.
    pub entry_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_entry_type_opposite() {
        assert_eq!(EntryType::Debit.opposite(), EntryType::Credit);
        assert_eq!(EntryType::Credit.opposite(), EntryType::Debit);
    }

    #[test]
    fn test_account_type_round_trip_through_str() {
        for account_type in AccountType::ALL {
            assert_eq!(AccountType::from_str(account_type.as_str()), Ok(account_type));
        }
        assert_eq!(AccountType::from_str("income"), Ok(AccountType::Income));
        assert!(AccountType::from_str("revenue").is_err());
    }

    #[test]
    fn test_normal_side() {
        assert_eq!(AccountType::Asset.normal_side(), EntryType::Debit);
        assert_eq!(AccountType::Expense.normal_side(), EntryType::Debit);
        assert_eq!(AccountType::Liability.normal_side(), EntryType::Credit);
        assert_eq!(AccountType::Equity.normal_side(), EntryType::Credit);
        assert_eq!(AccountType::Income.normal_side(), EntryType::Credit);
    }

    #[test]
    fn test_entry_totals_balanced() {
        let totals = EntryTotals::from_lines([
            (EntryType::Debit, dec!(60.00)),
            (EntryType::Debit, dec!(40.00)),
            (EntryType::Credit, dec!(100)),
        ])
        .unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_entry_totals_overflow_is_error() {
        let result = EntryTotals::from_lines([
            (EntryType::Debit, Decimal::MAX),
            (EntryType::Debit, Decimal::MAX),
            (EntryType::Credit, Decimal::MAX),
        ]);
        assert!(matches!(
            result,
            Err(LedgerError::InvalidEntryStructure(msg)) if msg == "debit total overflows"
        ));
    }

    #[test]
    fn test_entry_totals_unbalanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }

    #[test]
    fn test_entry_type_serializes_uppercase() {
        assert_eq!(EntryType::Debit.to_string(), "DEBIT");
        assert_eq!(EntryType::from_str("credit"), Ok(EntryType::Credit));
    }
}
