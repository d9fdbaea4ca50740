//! `SeaORM` active enums mapped to Postgres enum types.

use gl_core::ledger::types::{AccountType as CoreAccountType, EntryType as CoreEntryType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Postgres `ledger_account_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_account_type")]
pub enum AccountType {
    /// Asset.
    #[sea_orm(string_value = "ASSET")]
    Asset,
    /// Liability.
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    /// Equity.
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    /// Income.
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Expense.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

/// Postgres `journal_entry_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_type")]
pub enum EntryType {
    /// Debit.
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    /// Credit.
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

impl From<CoreAccountType> for AccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Equity => Self::Equity,
            CoreAccountType::Income => Self::Income,
            CoreAccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for CoreAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<CoreEntryType> for EntryType {
    fn from(value: CoreEntryType) -> Self {
        match value {
            CoreEntryType::Debit => Self::Debit,
            CoreEntryType::Credit => Self::Credit,
        }
    }
}

impl From<EntryType> for CoreEntryType {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::Debit => Self::Debit,
            EntryType::Credit => Self::Credit,
        }
    }
}
