//! Repository contracts for ledger persistence.
//!
//! The core depends only on these traits; `gl-db` implements them over Postgres
//! and [`super::memory::InMemoryLedgerStore`] implements them for tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use gl_shared::types::LedgerAccountId;

use super::error::LedgerError;
use super::types::{
    JournalEntry, LedgerAccount, LineTotals, NewJournalEntry, NewLedgerAccount, PeriodTotals,
};

/// Persistence for ledger accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account.
    ///
    /// Must fail with `DuplicateAccountCode` when the code is taken, enforced by
    /// the store itself rather than a prior lookup.
    async fn insert_account(&self, account: NewLedgerAccount)
    -> Result<LedgerAccount, LedgerError>;

    /// Finds an account by code.
    async fn find_by_code(&self, code: &str) -> Result<Option<LedgerAccount>, LedgerError>;

    /// Finds every account whose code is in `codes`. Unknown codes are omitted.
    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<LedgerAccount>, LedgerError>;

    /// Lists all accounts ordered by code.
    async fn list_accounts(&self) -> Result<Vec<LedgerAccount>, LedgerError>;

    /// Sets the active flag. Returns `None` when the code is unknown.
    async fn set_active(
        &self,
        code: &str,
        is_active: bool,
    ) -> Result<Option<LedgerAccount>, LedgerError>;
}

/// Persistence and aggregation for journal entries.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Returns true if an entry with this reference has been committed.
    async fn exists_by_reference(&self, reference: &str) -> Result<bool, LedgerError>;

    /// Persists the entry and all its lines as one atomic unit.
    ///
    /// Must fail with `DuplicateReference` when another entry with the same
    /// reference commits first; nothing is persisted in that case.
    async fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError>;

    /// Loads an entry with its lines ordered by line number.
    async fn find_by_reference(&self, reference: &str)
    -> Result<Option<JournalEntry>, LedgerError>;

    /// Sums debit and credit lines posted to one account.
    async fn account_totals(&self, account_id: LedgerAccountId) -> Result<LineTotals, LedgerError>;

    /// Sums debit and credit lines for every account that has lines.
    async fn totals_by_account(&self) -> Result<HashMap<LedgerAccountId, LineTotals>, LedgerError>;

    /// Sums lines of entries whose value date lies in `[from, to]`, with the entry count.
    async fn period_totals(&self, from: NaiveDate, to: NaiveDate)
    -> Result<PeriodTotals, LedgerError>;
}
