//! Ledger account repository.

use async_trait::async_trait;
use chrono::Utc;
use gl_core::ledger::types::{LedgerAccount, NewLedgerAccount};
use gl_core::ledger::AccountStore;
use gl_core::LedgerError;
use gl_shared::types::LedgerAccountId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use super::{db_err, is_unique_violation};
use crate::entities::ledger_accounts;

/// Ledger account repository backed by `ledger_accounts`.
#[derive(Debug, Clone)]
pub struct LedgerAccountRepository {
    db: DatabaseConnection,
}

impl LedgerAccountRepository {
    /// Creates a new ledger account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<ledger_accounts::Model> for LedgerAccount {
    fn from(model: ledger_accounts::Model) -> Self {
        Self {
            id: LedgerAccountId::from_uuid(model.id),
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl AccountStore for LedgerAccountRepository {
    async fn insert_account(
        &self,
        account: NewLedgerAccount,
    ) -> Result<LedgerAccount, LedgerError> {
        let now = Utc::now().into();
        let model = ledger_accounts::ActiveModel {
            id: Set(LedgerAccountId::new().into_inner()),
            code: Set(account.code.clone()),
            name: Set(account.name),
            account_type: Set(account.account_type.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique constraint on code decides; no lookup beforehand.
        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateAccountCode(account.code)
            } else {
                db_err(e)
            }
        })?;
        Ok(inserted.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LedgerAccount>, LedgerError> {
        let model = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<LedgerAccount>, LedgerError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let models = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::Code.is_in(codes.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_accounts(&self) -> Result<Vec<LedgerAccount>, LedgerError> {
        let models = ledger_accounts::Entity::find()
            .order_by_asc(ledger_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn set_active(
        &self,
        code: &str,
        is_active: bool,
    ) -> Result<Option<LedgerAccount>, LedgerError> {
        let Some(model) = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        if model.is_active == is_active {
            return Ok(Some(model.into()));
        }

        let mut active = model.into_active_model();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(db_err)?;
        debug!(account = %code, is_active, "Ledger account updated");
        Ok(Some(updated.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::AccountType;
    use gl_core::ledger::types::AccountType as CoreAccountType;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    fn model(code: &str, account_type: AccountType) -> ledger_accounts::Model {
        let now = Utc::now().into();
        ledger_accounts::Model {
            id: Uuid::now_v7(),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_by_code_maps_model() {
        let row = model("4000", AccountType::Income);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();
        let repo = LedgerAccountRepository::new(db);

        let account = repo.find_by_code("4000").await.unwrap().unwrap();
        assert_eq!(account.id.into_inner(), row.id);
        assert_eq!(account.account_type, CoreAccountType::Income);
        assert!(account.is_active);
    }

    #[tokio::test]
    async fn test_find_by_code_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<ledger_accounts::Model>::new()])
            .into_connection();
        let repo = LedgerAccountRepository::new(db);

        assert!(repo.find_by_code("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_codes_empty_input_skips_query() {
        // No results queued: a query would fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = LedgerAccountRepository::new(db);
        assert!(repo.find_by_codes(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                model("1000", AccountType::Asset),
                model("2000", AccountType::Liability),
            ]])
            .into_connection();
        let repo = LedgerAccountRepository::new(db);

        let codes: Vec<_> = repo
            .list_accounts()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(codes, vec!["1000", "2000"]);
    }

    #[tokio::test]
    async fn test_query_failure_is_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("down".to_string())])
            .into_connection();
        let repo = LedgerAccountRepository::new(db);

        let err = repo.list_accounts().await.unwrap_err();
        assert!(matches!(err, LedgerError::Database(_)));
    }
}
