//! In-memory ledger store.
//!
//! Intended for tests and local runs without Postgres. Accounts and journal data
//! share one lock so a save is observed all at once or not at all.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use gl_shared::types::LedgerAccountId;

use super::error::LedgerError;
use super::store::{AccountStore, JournalStore};
use super::types::{
    EntryType, JournalEntry, JournalLine, LedgerAccount, LineTotals, NewJournalEntry,
    NewLedgerAccount, PeriodTotals,
};

#[derive(Debug, Default)]
struct State {
    /// Keyed by code, so iteration is already ordered by code.
    accounts: BTreeMap<String, LedgerAccount>,
    /// Append-only.
    entries: Vec<JournalEntry>,
    /// Reference to index in `entries`.
    references: HashMap<String, usize>,
}

/// In-memory implementation of [`AccountStore`] and [`JournalStore`].
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed entries.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the lock is poisoned.
    pub fn entry_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.entries.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, LedgerError> {
        self.state
            .read()
            .map_err(|_| LedgerError::Internal("ledger store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, LedgerError> {
        self.state
            .write()
            .map_err(|_| LedgerError::Internal("ledger store lock poisoned".to_string()))
    }
}

fn add_line(totals: &mut LineTotals, line: &JournalLine) -> Result<(), LedgerError> {
    let total = match line.entry_type {
        EntryType::Debit => &mut totals.total_debit,
        EntryType::Credit => &mut totals.total_credit,
    };
    *total = total
        .checked_add(line.amount)
        .ok_or_else(|| LedgerError::Internal("ledger totals overflow".to_string()))?;
    Ok(())
}

#[async_trait]
impl AccountStore for InMemoryLedgerStore {
    async fn insert_account(
        &self,
        account: NewLedgerAccount,
    ) -> Result<LedgerAccount, LedgerError> {
        let mut state = self.write()?;
        if state.accounts.contains_key(&account.code) {
            return Err(LedgerError::DuplicateAccountCode(account.code));
        }

        let created = LedgerAccount {
            id: LedgerAccountId::new(),
            code: account.code,
            name: account.name,
            account_type: account.account_type,
            is_active: true,
            created_at: Utc::now(),
        };
        state.accounts.insert(created.code.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LedgerAccount>, LedgerError> {
        Ok(self.read()?.accounts.get(code).cloned())
    }

    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<LedgerAccount>, LedgerError> {
        let state = self.read()?;
        Ok(codes
            .iter()
            .filter_map(|code| state.accounts.get(code).cloned())
            .collect())
    }

    async fn list_accounts(&self) -> Result<Vec<LedgerAccount>, LedgerError> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    async fn set_active(
        &self,
        code: &str,
        is_active: bool,
    ) -> Result<Option<LedgerAccount>, LedgerError> {
        let mut state = self.write()?;
        Ok(state.accounts.get_mut(code).map(|account| {
            account.is_active = is_active;
            account.clone()
        }))
    }
}

#[async_trait]
impl JournalStore for InMemoryLedgerStore {
    async fn exists_by_reference(&self, reference: &str) -> Result<bool, LedgerError> {
        Ok(self.read()?.references.contains_key(reference))
    }

    async fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write()?;

        if state.references.contains_key(&entry.reference) {
            return Err(LedgerError::DuplicateReference(entry.reference));
        }

        // Every line must point at a known account, like the FK in Postgres.
        for line in &entry.lines {
            let known = state
                .accounts
                .get(&line.account_code)
                .is_some_and(|a| a.id == line.account_id);
            if !known {
                return Err(LedgerError::AccountNotFound(line.account_code.clone()));
            }
        }

        let lines = entry
            .lines
            .into_iter()
            .map(|line| JournalLine {
                id: line.id,
                entry_id: entry.id,
                line_no: line.line_no,
                account_id: line.account_id,
                account_code: line.account_code,
                entry_type: line.entry_type,
                amount: line.amount,
            })
            .collect();

        let saved = JournalEntry {
            id: entry.id,
            reference: entry.reference,
            description: entry.description,
            value_date: entry.value_date,
            created_at: Utc::now(),
            lines,
        };

        let index = state.entries.len();
        state.references.insert(saved.reference.clone(), index);
        state.entries.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let state = self.read()?;
        Ok(state
            .references
            .get(reference)
            .and_then(|&index| state.entries.get(index))
            .cloned())
    }

    async fn account_totals(&self, account_id: LedgerAccountId) -> Result<LineTotals, LedgerError> {
        let state = self.read()?;
        let mut totals = LineTotals::default();
        for line in state
            .entries
            .iter()
            .flat_map(|e| &e.lines)
            .filter(|l| l.account_id == account_id)
        {
            add_line(&mut totals, line)?;
        }
        Ok(totals)
    }

    async fn totals_by_account(
        &self,
    ) -> Result<HashMap<LedgerAccountId, LineTotals>, LedgerError> {
        let state = self.read()?;
        let mut totals: HashMap<LedgerAccountId, LineTotals> = HashMap::new();
        for line in state.entries.iter().flat_map(|e| &e.lines) {
            add_line(totals.entry(line.account_id).or_default(), line)?;
        }
        Ok(totals)
    }

    async fn period_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PeriodTotals, LedgerError> {
        let state = self.read()?;
        let mut line_totals = LineTotals::default();
        let mut entry_count = 0_u64;
        for entry in state
            .entries
            .iter()
            .filter(|e| e.value_date >= from && e.value_date <= to)
        {
            entry_count += 1;
            for line in &entry.lines {
                add_line(&mut line_totals, line)?;
            }
        }
        Ok(PeriodTotals {
            total_debit: line_totals.total_debit,
            total_credit: line_totals.total_credit,
            entry_count,
        })
    }
}
