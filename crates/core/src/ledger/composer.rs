//! Journal entry composer.
//!
//! The only path by which journal data is created. Every higher-level posting
//! flow (policy postings, reversals, the HTTP API) funnels through [`JournalComposer::post`].

use std::sync::Arc;

use chrono::NaiveDate;
use gl_shared::types::{JournalEntryId, JournalLineId};
use tracing::{debug, info, warn};

use super::directory::AccountDirectory;
use super::error::LedgerError;
use super::reversal::reversing_entry;
use super::store::JournalStore;
use super::types::{JournalEntry, LedgerAccount, NewJournalEntry, NewJournalLine, PostJournalEntry};
use super::validation::{check_balance, validate_structure};

/// Validates and persists balanced journal entries.
#[derive(Clone)]
pub struct JournalComposer {
    directory: AccountDirectory,
    journal: Arc<dyn JournalStore>,
}

impl JournalComposer {
    /// Creates a composer.
    #[must_use]
    pub fn new(directory: AccountDirectory, journal: Arc<dyn JournalStore>) -> Self {
        Self { directory, journal }
    }

    /// Returns the directory used to resolve account codes.
    #[must_use]
    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    /// Validates and persists a journal entry.
    ///
    /// Validation runs in order, failing fast:
    /// 1. Reference already used (`DuplicateReference`)
    /// 2. Fewer than 2 lines, blank/oversized header, bad amount (`InvalidEntryStructure`)
    /// 3. Unknown account code (`AccountNotFound`), inactive account (`AccountInactive`)
    /// 4. Debits differ from credits (`UnbalancedEntry`)
    ///
    /// The entry and all lines are saved as one atomic unit. A concurrent post
    /// with the same reference that commits first makes this call fail with
    /// `DuplicateReference` from the store's uniqueness constraint.
    ///
    /// # Errors
    ///
    /// Returns the first failed check or a store error.
    pub async fn post(&self, input: PostJournalEntry) -> Result<JournalEntry, LedgerError> {
        self.ensure_unposted(&input.reference).await?;

        validate_structure(&input)?;

        let accounts = self.resolve_accounts(&input).await?;

        let totals = check_balance(&input.lines)?;

        let entry = NewJournalEntry {
            id: JournalEntryId::new(),
            reference: input.reference,
            description: input.description,
            value_date: input.value_date,
            lines: input
                .lines
                .into_iter()
                .zip(accounts)
                .zip(1..)
                .map(|((line, account), line_no)| NewJournalLine {
                    id: JournalLineId::new(),
                    line_no,
                    account_id: account.id,
                    account_code: line.account_code,
                    entry_type: line.entry_type,
                    amount: line.amount,
                })
                .collect(),
        };

        let saved = self.journal.save(entry).await.inspect_err(|e| {
            if matches!(e, LedgerError::DuplicateReference(_)) {
                warn!(error = %e, "Lost race on journal entry reference");
            }
        })?;

        info!(
            reference = %saved.reference,
            entry_id = %saved.id,
            lines = saved.lines.len(),
            amount = %totals.total_debit,
            "Journal entry posted"
        );
        Ok(saved)
    }

    /// Fails with `DuplicateReference` if an entry already uses `reference`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReference` or a store error.
    pub async fn ensure_unposted(&self, reference: &str) -> Result<(), LedgerError> {
        if self.journal.exists_by_reference(reference).await? {
            debug!(reference = %reference, "Rejected already-posted reference");
            return Err(LedgerError::DuplicateReference(reference.to_string()));
        }
        Ok(())
    }

    /// Loads a posted entry by reference.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry has this reference.
    pub async fn get_entry(&self, reference: &str) -> Result<JournalEntry, LedgerError> {
        self.journal
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| LedgerError::EntryNotFound(reference.to_string()))
    }

    /// Posts an entry offsetting `original_reference`. The original is untouched.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the original is unknown, otherwise any error
    /// [`Self::post`] can return for the reversing entry.
    pub async fn reverse(
        &self,
        original_reference: &str,
        reversal_reference: &str,
        value_date: NaiveDate,
        description: Option<&str>,
    ) -> Result<JournalEntry, LedgerError> {
        let original = self.get_entry(original_reference).await?;
        let input = reversing_entry(&original, reversal_reference, value_date, description);
        let reversal = self.post(input).await?;
        info!(
            original = %original_reference,
            reversal = %reversal.reference,
            "Journal entry reversed"
        );
        Ok(reversal)
    }

    /// Resolves each line's account, in line order, and rejects inactive ones.
    async fn resolve_accounts(
        &self,
        input: &PostJournalEntry,
    ) -> Result<Vec<LedgerAccount>, LedgerError> {
        let codes: Vec<String> = input.lines.iter().map(|l| l.account_code.clone()).collect();
        let accounts = self.directory.resolve_codes(&codes).await?;

        if let Some(inactive) = accounts.iter().find(|a| !a.is_active) {
            return Err(LedgerError::AccountInactive(inactive.code.clone()));
        }

        Ok(accounts)
    }
}
