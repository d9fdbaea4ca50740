//! Ledger error types.
//!
//! One error type crosses the directory, composer, policy mapper, balance query,
//! stores and posting gateways, so a failure surfaces unchanged at every layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Opaque message returned to callers for internal failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred";

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// An entry with this reference already exists.
    #[error("Journal entry reference '{0}' has already been posted")]
    DuplicateReference(String),

    /// The entry is structurally invalid (too few lines, bad amount, blank fields).
    #[error("Invalid journal entry: {0}")]
    InvalidEntryStructure(String),

    /// Debits do not equal credits.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Reconciliation range is inverted.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// Start of the range.
        from: NaiveDate,
        /// End of the range.
        to: NaiveDate,
    },

    /// A policy posting request failed validation.
    #[error("Invalid posting request: {0}")]
    InvalidPostingRequest(String),

    // ========== Account Errors ==========
    /// No ledger account with this code.
    #[error("Ledger account not found: {0}")]
    AccountNotFound(String),

    /// Ledger account exists but is deactivated.
    #[error("Ledger account {0} is inactive")]
    AccountInactive(String),

    /// Account administration input is malformed (blank or oversized code/name).
    #[error("Invalid ledger account: {0}")]
    InvalidAccount(String),

    /// Ledger account code already in use.
    #[error("Ledger account code '{0}' already exists")]
    DuplicateAccountCode(String),

    // ========== Entry Errors ==========
    /// No journal entry with this reference.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(String),

    // ========== Policy Errors ==========
    /// No posting rule for the operation type.
    #[error("No posting policy configured for operation type {0}")]
    PolicyNotConfigured(String),

    /// The posting policy configuration is malformed.
    #[error("Invalid posting policy: {0}")]
    InvalidPolicy(String),

    // ========== Integration Errors ==========
    /// A downstream posting call failed.
    #[error("Ledger posting failed: {0}")]
    LedgerPostingFailed(String),

    // ========== Internal Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::InvalidEntryStructure(_) => "INVALID_ENTRY_STRUCTURE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::InvalidPostingRequest(_) => "INVALID_POSTING_REQUEST",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::PolicyNotConfigured(_) => "POLICY_NOT_CONFIGURED",
            Self::InvalidPolicy(_) => "INVALID_POLICY",
            Self::LedgerPostingFailed(_) => "LEDGER_POSTING_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidEntryStructure(_)
            | Self::UnbalancedEntry { .. }
            | Self::InvalidDateRange { .. }
            | Self::InvalidPostingRequest(_)
            | Self::InvalidAccount(_)
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict - uniqueness errors
            Self::DuplicateReference(_) | Self::DuplicateAccountCode(_) => 409,

            // 422 Unprocessable - no rule for a well-formed request
            Self::PolicyNotConfigured(_) => 422,

            // 502 Bad Gateway - downstream posting failure
            Self::LedgerPostingFailed(_) => 502,

            // 500 Internal Server Error
            Self::InvalidPolicy(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if the caller can fix the request and resubmit.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }

    /// Returns true for failures whose detail must not leave the service.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InvalidPolicy(_) | Self::Database(_) | Self::Internal(_)
        )
    }

    /// Returns the message safe to show a caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(LedgerError::DuplicateReference("r".into()), "DUPLICATE_REFERENCE", 409)]
    #[case(LedgerError::InvalidEntryStructure("x".into()), "INVALID_ENTRY_STRUCTURE", 400)]
    #[case(LedgerError::AccountNotFound("9999".into()), "ACCOUNT_NOT_FOUND", 404)]
    #[case(LedgerError::DuplicateAccountCode("1000".into()), "DUPLICATE_ACCOUNT_CODE", 409)]
    #[case(LedgerError::EntryNotFound("r".into()), "ENTRY_NOT_FOUND", 404)]
    #[case(LedgerError::PolicyNotConfigured("FEE".into()), "POLICY_NOT_CONFIGURED", 422)]
    #[case(LedgerError::LedgerPostingFailed("down".into()), "LEDGER_POSTING_FAILED", 502)]
    #[case(LedgerError::Database("boom".into()), "DATABASE_ERROR", 500)]
    fn test_error_code_and_status(
        #[case] error: LedgerError,
        #[case] code: &str,
        #[case] status: u16,
    ) {
        assert_eq!(error.error_code(), code);
        assert_eq!(error.http_status_code(), status);
    }

    #[test]
    fn test_unbalanced_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_invalid_date_range_display() {
        let err = LedgerError::InvalidDateRange {
            from: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert_eq!(err.to_string(), "Invalid date range: 2026-02-01 is after 2026-01-01");
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let err = LedgerError::Database("relation \"journal_entries\" does not exist".into());
        assert!(err.is_internal());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);

        let err = LedgerError::AccountNotFound("9999".into());
        assert!(!err.is_internal());
        assert_eq!(err.public_message(), "Ledger account not found: 9999");
    }

    #[test]
    fn test_posting_failure_is_not_client_error() {
        assert!(!LedgerError::LedgerPostingFailed("x".into()).is_client_error());
        assert!(LedgerError::DuplicateReference("x".into()).is_client_error());
    }
}
