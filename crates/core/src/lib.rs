//! Core general-ledger posting logic.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the [`ledger::AccountStore`] and
//! [`ledger::JournalStore`] traits.
//!
//! # Modules
//!
//! - `ledger` - Account directory, journal entry composer, balance and reconciliation queries
//! - `policy` - Operation type to GL account policy and the policy posting mapper

pub mod ledger;
pub mod policy;

pub use ledger::LedgerError;
