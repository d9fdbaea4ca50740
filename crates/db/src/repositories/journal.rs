//! Journal entry repository.
//!
//! Writes go through one database transaction per entry; the deferred balance
//! trigger and the unique constraint on `reference` are checked at commit.
//! Aggregates are single statements, so each sees one read-committed snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use gl_core::ledger::types::{JournalEntry, JournalLine, LineTotals, NewJournalEntry, PeriodTotals};
use gl_core::ledger::JournalStore;
use gl_core::LedgerError;
use gl_shared::types::{JournalEntryId, JournalLineId, LedgerAccountId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, is_unique_violation};
use crate::entities::{journal_entries, journal_entry_lines, ledger_accounts};

const ACCOUNT_TOTALS_SQL: &str = r"
SELECT
    COALESCE(SUM(CASE WHEN entry_type = 'DEBIT' THEN amount END), 0) AS total_debit,
    COALESCE(SUM(CASE WHEN entry_type = 'CREDIT' THEN amount END), 0) AS total_credit
FROM journal_entry_lines
WHERE ledger_account_id = $1
";

const TOTALS_BY_ACCOUNT_SQL: &str = r"
SELECT
    ledger_account_id,
    COALESCE(SUM(CASE WHEN entry_type = 'DEBIT' THEN amount END), 0) AS total_debit,
    COALESCE(SUM(CASE WHEN entry_type = 'CREDIT' THEN amount END), 0) AS total_credit
FROM journal_entry_lines
GROUP BY ledger_account_id
";

const PERIOD_TOTALS_SQL: &str = r"
SELECT
    COALESCE(SUM(CASE WHEN l.entry_type = 'DEBIT' THEN l.amount END), 0) AS total_debit,
    COALESCE(SUM(CASE WHEN l.entry_type = 'CREDIT' THEN l.amount END), 0) AS total_credit,
    COUNT(DISTINCT e.id) AS entry_count
FROM journal_entries e
LEFT JOIN journal_entry_lines l ON l.journal_entry_id = e.id
WHERE e.value_date BETWEEN $1 AND $2
";

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    total_debit: Decimal,
    total_credit: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct AccountTotalsRow {
    ledger_account_id: Uuid,
    total_debit: Decimal,
    total_credit: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct PeriodTotalsRow {
    total_debit: Decimal,
    total_credit: Decimal,
    entry_count: i64,
}

/// Journal entry repository backed by `journal_entries` and `journal_entry_lines`.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    db: DatabaseConnection,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Maps a write failure, turning a reference conflict into `DuplicateReference`.
fn map_save_err(err: DbErr, reference: &str) -> LedgerError {
    if is_unique_violation(&err) {
        LedgerError::DuplicateReference(reference.to_string())
    } else {
        db_err(err)
    }
}

fn line_from_model(model: journal_entry_lines::Model, account_code: String) -> JournalLine {
    JournalLine {
        id: JournalLineId::from_uuid(model.id),
        entry_id: JournalEntryId::from_uuid(model.journal_entry_id),
        line_no: model.line_no,
        account_id: LedgerAccountId::from_uuid(model.ledger_account_id),
        account_code,
        entry_type: model.entry_type.into(),
        amount: model.amount,
    }
}

#[async_trait]
impl JournalStore for JournalEntryRepository {
    async fn exists_by_reference(&self, reference: &str) -> Result<bool, LedgerError> {
        let count = journal_entries::Entity::find()
            .filter(journal_entries::Column::Reference.eq(reference))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        let reference = entry.reference.clone();
        let created_at = Utc::now();

        // Start database transaction
        let txn = self.db.begin().await.map_err(db_err)?;

        journal_entries::ActiveModel {
            id: Set(entry.id.into_inner()),
            reference: Set(entry.reference.clone()),
            description: Set(entry.description.clone()),
            value_date: Set(entry.value_date),
            created_at: Set(created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_save_err(e, &reference))?;

        let lines = entry.lines.iter().map(|line| journal_entry_lines::ActiveModel {
            id: Set(line.id.into_inner()),
            journal_entry_id: Set(entry.id.into_inner()),
            line_no: Set(line.line_no),
            ledger_account_id: Set(line.account_id.into_inner()),
            entry_type: Set(line.entry_type.into()),
            amount: Set(line.amount),
        });
        journal_entry_lines::Entity::insert_many(lines)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        // Commit database transaction; deferred balance trigger runs here
        txn.commit()
            .await
            .map_err(|e| map_save_err(e, &reference))?;

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

        Ok(JournalEntry {
            id: entry.id,
            reference: entry.reference,
            description: entry.description,
            value_date: entry.value_date,
            created_at,
            lines,
        })
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let Some(header) = journal_entries::Entity::find()
            .filter(journal_entries::Column::Reference.eq(reference))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let rows = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(header.id))
            .order_by_asc(journal_entry_lines::Column::LineNo)
            .find_also_related(ledger_accounts::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let lines = rows
            .into_iter()
            .map(|(line, account)| {
                let code = account.map(|a| a.code).ok_or_else(|| {
                    LedgerError::Internal(format!("journal line {} has no ledger account", line.id))
                })?;
                Ok(line_from_model(line, code))
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(Some(JournalEntry {
            id: JournalEntryId::from_uuid(header.id),
            reference: header.reference,
            description: header.description,
            value_date: header.value_date,
            created_at: header.created_at.with_timezone(&Utc),
            lines,
        }))
    }

    async fn account_totals(&self, account_id: LedgerAccountId) -> Result<LineTotals, LedgerError> {
        let row = TotalsRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            ACCOUNT_TOTALS_SQL,
            [account_id.into_inner().into()],
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?;

        Ok(row.map_or_else(LineTotals::default, |r| LineTotals {
            total_debit: r.total_debit,
            total_credit: r.total_credit,
        }))
    }

    async fn totals_by_account(
        &self,
    ) -> Result<HashMap<LedgerAccountId, LineTotals>, LedgerError> {
        let rows = AccountTotalsRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            TOTALS_BY_ACCOUNT_SQL,
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    LedgerAccountId::from_uuid(r.ledger_account_id),
                    LineTotals {
                        total_debit: r.total_debit,
                        total_credit: r.total_credit,
                    },
                )
            })
            .collect())
    }

    async fn period_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PeriodTotals, LedgerError> {
        let row = PeriodTotalsRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            PERIOD_TOTALS_SQL,
            [from.into(), to.into()],
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(PeriodTotals::default());
        };
        let entry_count = u64::try_from(row.entry_count)
            .map_err(|e| LedgerError::Internal(format!("negative entry count: {e}")))?;

        Ok(PeriodTotals {
            total_debit: row.total_debit,
            total_credit: row.total_credit,
            entry_count,
        })
    }
}
