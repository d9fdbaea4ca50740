//! Double-entry general ledger.
//!
//! - Ledger account directory
//! - Journal entry composer (the only writer of journal data)
//! - Balance, reconciliation and trial balance queries
//! - Repository traits and an in-memory store

pub mod balance;
pub mod composer;
pub mod directory;
pub mod error;
pub mod memory;
pub mod query;
pub mod reversal;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{AccountBalance, Reconciliation, TrialBalance, TrialBalanceRow};
pub use composer::JournalComposer;
pub use directory::AccountDirectory;
pub use error::LedgerError;
pub use memory::InMemoryLedgerStore;
pub use query::BalanceQuery;
pub use store::{AccountStore, JournalStore};
pub use types::{
    AccountType, EntryTotals, EntryType, JournalEntry, JournalLine, JournalLineInput,
    LedgerAccount, LineTotals, NewJournalEntry, NewJournalLine, NewLedgerAccount, PeriodTotals,
    PostJournalEntry,
};
