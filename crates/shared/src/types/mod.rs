//! Common types used across the application.

pub mod amount;
pub mod id;

pub use amount::{LEDGER_MAX_INTEGER_DIGITS, LEDGER_SCALE, REQUEST_MAX_INTEGER_DIGITS, REQUEST_SCALE};
pub use id::*;
