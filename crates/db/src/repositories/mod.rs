//! Repository implementations of the ledger store traits.
//!
//! Repositories hide the `SeaORM` details from the rest of the application; the
//! core only sees [`gl_core::ledger::AccountStore`] and [`gl_core::ledger::JournalStore`].

pub mod account;
pub mod journal;

pub use account::LedgerAccountRepository;
pub use journal::JournalEntryRepository;

use gl_core::LedgerError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error that has no domain meaning.
pub(crate) fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Returns true if the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
