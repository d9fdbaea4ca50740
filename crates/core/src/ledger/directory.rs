//! Ledger account directory.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::LedgerError;
use super::store::AccountStore;
use super::types::{LedgerAccount, NewLedgerAccount};
use super::validation::check_text;

/// Maximum length of a ledger account code.
pub const MAX_ACCOUNT_CODE_LEN: usize = 32;
/// Maximum length of a ledger account name.
pub const MAX_ACCOUNT_NAME_LEN: usize = 255;

/// The set of named general-ledger accounts.
///
/// Accounts are never removed, only deactivated.
#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn AccountStore>,
}

impl AccountDirectory {
    /// Creates a directory over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccount` for a blank or oversized code or name and
    /// `DuplicateAccountCode` if the code exists.
    pub async fn create_account(
        &self,
        account: NewLedgerAccount,
    ) -> Result<LedgerAccount, LedgerError> {
        check_text("code", &account.code, MAX_ACCOUNT_CODE_LEN).map_err(LedgerError::InvalidAccount)?;
        check_text("name", &account.name, MAX_ACCOUNT_NAME_LEN).map_err(LedgerError::InvalidAccount)?;
        if account.code.trim() != account.code {
            return Err(LedgerError::InvalidAccount(
                "code must not have surrounding whitespace".to_string(),
            ));
        }

        let created = self.store.insert_account(account).await?;
        info!(
            account = %created.code,
            account_type = %created.account_type,
            "Ledger account created"
        );
        Ok(created)
    }

    /// Looks up an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this code.
    pub async fn get_by_code(&self, code: &str) -> Result<LedgerAccount, LedgerError> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
    }

    /// Lists all accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn list_all(&self) -> Result<Vec<LedgerAccount>, LedgerError> {
        self.store.list_accounts().await
    }

    /// Resolves every code in `codes`, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` naming the first unresolved code.
    pub async fn resolve_codes(&self, codes: &[String]) -> Result<Vec<LedgerAccount>, LedgerError> {
        let found = self.store.find_by_codes(codes).await?;
        codes
            .iter()
            .map(|code| {
                found
                    .iter()
                    .find(|a| &a.code == code)
                    .cloned()
                    .ok_or_else(|| LedgerError::AccountNotFound(code.clone()))
            })
            .collect()
    }

    /// Marks an account inactive; it rejects new lines afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this code.
    pub async fn deactivate(&self, code: &str) -> Result<LedgerAccount, LedgerError> {
        self.set_active(code, false).await
    }

    /// Marks an account active again.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this code.
    pub async fn activate(&self, code: &str) -> Result<LedgerAccount, LedgerError> {
        self.set_active(code, true).await
    }

    async fn set_active(&self, code: &str, is_active: bool) -> Result<LedgerAccount, LedgerError> {
        let account = self
            .store
            .set_active(code, is_active)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        debug!(account = %code, is_active, "Ledger account activation changed");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::InMemoryLedgerStore;
    use crate::ledger::types::AccountType;

    fn directory() -> AccountDirectory {
        AccountDirectory::new(Arc::new(InMemoryLedgerStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let dir = directory();
        let created = dir
            .create_account(NewLedgerAccount::new("1000", "Cash", AccountType::Asset))
            .await
            .unwrap();
        assert!(created.is_active);

        let fetched = dir.get_by_code("1000").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let dir = directory();
        dir.create_account(NewLedgerAccount::new("1000", "Cash", AccountType::Asset))
            .await
            .unwrap();
        let err = dir
            .create_account(NewLedgerAccount::new("1000", "Cash again", AccountType::Asset))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateAccountCode(_)));
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let err = directory().get_by_code("9999").await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(code) if code == "9999"));
    }

    #[tokio::test]
    async fn test_invalid_account_input() {
        let dir = directory();
        let err = dir
            .create_account(NewLedgerAccount::new("  ", "Cash", AccountType::Asset))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAccount(_)));

        let err = dir
            .create_account(NewLedgerAccount::new("1".repeat(33), "Cash", AccountType::Asset))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAccount(_)));
    }

    #[tokio::test]
    async fn test_list_all_ordered_by_code() {
        let dir = directory();
        for (code, name, kind) in [
            ("5000", "Interest Expense", AccountType::Expense),
            ("1000", "Cash", AccountType::Asset),
            ("2000", "Customer Deposits", AccountType::Liability),
        ] {
            dir.create_account(NewLedgerAccount::new(code, name, kind))
                .await
                .unwrap();
        }
        let codes: Vec<_> = dir.list_all().await.unwrap().into_iter().map(|a| a.code).collect();
        assert_eq!(codes, vec!["1000", "2000", "5000"]);
    }

    #[tokio::test]
    async fn test_resolve_codes_reports_first_missing() {
        let dir = directory();
        dir.create_account(NewLedgerAccount::new("1000", "Cash", AccountType::Asset))
            .await
            .unwrap();
        let codes = vec!["1000".to_string(), "8888".to_string(), "9999".to_string()];
        let err = dir.resolve_codes(&codes).await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(code) if code == "8888"));
    }

    #[tokio::test]
    async fn test_deactivate_and_activate() {
        let dir = directory();
        dir.create_account(NewLedgerAccount::new("1000", "Cash", AccountType::Asset))
            .await
            .unwrap();

        assert!(!dir.deactivate("1000").await.unwrap().is_active);
        assert!(!dir.get_by_code("1000").await.unwrap().is_active);
        assert!(dir.activate("1000").await.unwrap().is_active);

        let err = dir.deactivate("9999").await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(_)));
    }
}
