//! Posting policy types.

use std::collections::HashMap;

use chrono::NaiveDate;
use gl_shared::types::amount::{
    is_valid_request_amount, REQUEST_MAX_INTEGER_DIGITS, REQUEST_SCALE,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::types::EntryType;
use crate::ledger::validation::{check_text, MAX_DESCRIPTION_LEN, MAX_REFERENCE_LEN};
use crate::ledger::LedgerError;

/// Maximum length of an external account reference.
pub const MAX_ACCOUNT_REF_LEN: usize = 64;

/// Business operation that originates a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    /// Outgoing payment.
    Payment,
    /// Transfer between customer accounts.
    Transfer,
    /// Cash deposit.
    Deposit,
    /// Cash withdrawal.
    Withdrawal,
    /// Fee charge.
    Fee,
    /// Interest accrual or payout.
    Interest,
}

impl OperationType {
    /// All operation types.
    pub const ALL: [Self; 6] = [
        Self::Payment,
        Self::Transfer,
        Self::Deposit,
        Self::Withdrawal,
        Self::Fee,
        Self::Interest,
    ];

    /// Returns the wire representation (`PAYMENT`, `FEE`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "PAYMENT",
            Self::Transfer => "TRANSFER",
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Fee => "FEE",
            Self::Interest => "INTEREST",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown operation type: {s}"))
    }
}

/// A GL account role: one shared account plus per-reference overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBinding {
    /// Human-readable role label.
    pub role: String,
    /// GL code used when no override matches.
    pub account: String,
    /// External account reference to GL code.
    pub overrides: HashMap<String, String>,
}

impl RoleBinding {
    /// Creates a binding with no overrides.
    #[must_use]
    pub fn shared(role: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            account: account.into(),
            overrides: HashMap::new(),
        }
    }

    /// Resolves an external reference to a GL code.
    #[must_use]
    pub fn resolve(&self, external_ref: Option<&str>) -> &str {
        external_ref
            .and_then(|r| self.overrides.get(r))
            .map_or(self.account.as_str(), String::as_str)
    }
}

/// How one operation type maps onto two GL roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    /// Side the source account lands on; the destination takes the other.
    pub source_side: EntryType,
    /// Role for `source_account_ref`.
    pub source: RoleBinding,
    /// Role for `destination_account_ref` (or its default).
    pub destination: RoleBinding,
}

/// A business posting request, as submitted by payment, fee and interest callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyPostingRequest {
    /// Globally unique idempotency key.
    pub reference: String,
    /// Free-text description.
    pub description: String,
    /// Accounting date.
    pub value_date: NaiveDate,
    /// Business operation.
    pub operation_type: OperationType,
    /// Strictly positive, at most 2 fractional digits.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// External identifier of the source account.
    pub source_account_ref: String,
    /// External identifier of the destination account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account_ref: Option<String>,
}

impl PolicyPostingRequest {
    /// Checks field limits before any lookup.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPostingRequest` describing the first violation.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_text("reference", &self.reference, MAX_REFERENCE_LEN)
            .and_then(|()| check_text("description", &self.description, MAX_DESCRIPTION_LEN))
            .and_then(|()| {
                check_text("source_account_ref", &self.source_account_ref, MAX_ACCOUNT_REF_LEN)
            })
            .and_then(|()| match &self.destination_account_ref {
                Some(dest) => check_text("destination_account_ref", dest, MAX_ACCOUNT_REF_LEN),
                None => Ok(()),
            })
            .map_err(LedgerError::InvalidPostingRequest)?;

        if !is_valid_request_amount(self.amount) {
            return Err(LedgerError::InvalidPostingRequest(format!(
                "amount {} must be positive with at most {REQUEST_MAX_INTEGER_DIGITS} integer \
                 and {REQUEST_SCALE} fractional digits",
                self.amount
            )));
        }

        Ok(())
    }
}
