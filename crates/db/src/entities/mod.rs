//! `SeaORM` entity definitions for the ledger schema.

pub mod prelude;

pub mod journal_entries;
pub mod journal_entry_lines;
pub mod ledger_accounts;
pub mod sea_orm_active_enums;
