//! Balance and reconciliation queries.
//!
//! Read-only aggregation over committed lines. No running balance is kept, so
//! concurrent posts to one account cannot lose an update.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::balance::{natural_balance, AccountBalance, Reconciliation, TrialBalance, TrialBalanceRow};
use super::directory::AccountDirectory;
use super::error::LedgerError;
use super::store::JournalStore;

/// Answers balance, reconciliation and trial balance queries.
#[derive(Clone)]
pub struct BalanceQuery {
    directory: AccountDirectory,
    journal: Arc<dyn JournalStore>,
}

impl BalanceQuery {
    /// Creates a query service.
    #[must_use]
    pub fn new(directory: AccountDirectory, journal: Arc<dyn JournalStore>) -> Self {
        Self { directory, journal }
    }

    /// Returns the debit, credit and net totals of one account over all lines.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the code is unknown.
    pub async fn get_balance(&self, account_code: &str) -> Result<AccountBalance, LedgerError> {
        let account = self.directory.get_by_code(account_code).await?;
        let totals = self.journal.account_totals(account.id).await?;
        Ok(AccountBalance::from_totals(account.code, totals))
    }

    /// Totals every line of entries whose value date is in `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `from > to`, before the store is queried.
    pub async fn reconcile(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Reconciliation, LedgerError> {
        if from > to {
            return Err(LedgerError::InvalidDateRange { from, to });
        }

        let totals = self.journal.period_totals(from, to).await?;
        let reconciliation = Reconciliation::new(from, to, totals);

        if reconciliation.balanced {
            debug!(%from, %to, entries = reconciliation.entry_count, "Ledger reconciled");
        } else {
            warn!(
                %from,
                %to,
                debit = %reconciliation.total_debit,
                credit = %reconciliation.total_credit,
                "Ledger does not reconcile"
            );
        }
        Ok(reconciliation)
    }

    /// Returns every account's totals, ordered by code, with grand totals.
    ///
    /// # Errors
    ///
    /// Returns a store error if either lookup fails.
    pub async fn trial_balance(&self) -> Result<TrialBalance, LedgerError> {
        let accounts = self.directory.list_all().await?;
        let totals = self.journal.totals_by_account().await?;

        let rows = accounts
            .into_iter()
            .map(|account| {
                let t = totals.get(&account.id).copied().unwrap_or_default();
                TrialBalanceRow {
                    net_balance: t.total_debit - t.total_credit,
                    natural_balance: natural_balance(account.account_type, t.total_debit, t.total_credit),
                    total_debit: t.total_debit,
                    total_credit: t.total_credit,
                    code: account.code,
                    name: account.name,
                    account_type: account.account_type,
                }
            })
            .collect();

        TrialBalance::from_rows(rows)
    }
}
