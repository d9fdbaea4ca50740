//! Entity re-exports.

pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::ledger_accounts::Entity as LedgerAccounts;
