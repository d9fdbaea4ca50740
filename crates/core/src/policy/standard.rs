//! Built-in chart of accounts and posting policy, plus loading both from config.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use gl_shared::config::{ChartAccountConfig, PolicyRoleConfig, PolicyRuleConfig};

use super::types::{OperationType, PolicyRule, RoleBinding};
use crate::ledger::types::{AccountType, EntryType, NewLedgerAccount};
use crate::ledger::LedgerError;

/// Cash on hand and at the central bank.
pub const CASH: &str = "1000";
/// Outgoing payments awaiting settlement.
pub const PAYMENT_CLEARING: &str = "1200";
/// Customer sub-ledgers, aggregated.
pub const CUSTOMER_DEPOSITS: &str = "2000";
/// Internal transfers awaiting settlement.
pub const TRANSFER_CLEARING: &str = "2100";
/// Retained earnings.
pub const RETAINED_EARNINGS: &str = "3000";
/// Fee income.
pub const FEE_INCOME: &str = "4000";
/// Interest paid to customers.
pub const INTEREST_EXPENSE: &str = "5000";

/// Returns the standard chart of accounts.
#[must_use]
pub fn standard_chart() -> Vec<NewLedgerAccount> {
    vec![
        NewLedgerAccount::new(CASH, "Cash", AccountType::Asset),
        NewLedgerAccount::new(PAYMENT_CLEARING, "Payment Clearing", AccountType::Asset),
        NewLedgerAccount::new(CUSTOMER_DEPOSITS, "Customer Deposits", AccountType::Liability),
        NewLedgerAccount::new(TRANSFER_CLEARING, "Transfer Clearing", AccountType::Liability),
        NewLedgerAccount::new(RETAINED_EARNINGS, "Retained Earnings", AccountType::Equity),
        NewLedgerAccount::new(FEE_INCOME, "Fee Income", AccountType::Income),
        NewLedgerAccount::new(INTEREST_EXPENSE, "Interest Expense", AccountType::Expense),
    ]
}

/// Converts a configured chart; an empty list means [`standard_chart`].
///
/// # Errors
///
/// Returns `InvalidAccount` for an unknown account type.
pub fn chart_from_config(chart: &[ChartAccountConfig]) -> Result<Vec<NewLedgerAccount>, LedgerError> {
    if chart.is_empty() {
        return Ok(standard_chart());
    }
    chart
        .iter()
        .map(|entry| {
            let account_type =
                AccountType::from_str(&entry.account_type).map_err(LedgerError::InvalidAccount)?;
            Ok(NewLedgerAccount::new(&entry.code, &entry.name, account_type))
        })
        .collect()
}

/// Static operation type to GL role mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPolicy {
    rules: HashMap<OperationType, PolicyRule>,
}

impl PostingPolicy {
    /// Returns the standard policy.
    ///
    /// | Operation  | Source side | Source | Destination |
    /// |------------|-------------|--------|-------------|
    /// | PAYMENT    | DEBIT       | 2000   | 1200        |
    /// | TRANSFER   | DEBIT       | 2000   | 2100        |
    /// | DEPOSIT    | CREDIT      | 2000   | 1000        |
    /// | WITHDRAWAL | DEBIT       | 2000   | 1000        |
    /// | FEE        | DEBIT       | 1000   | 4000        |
    /// | INTEREST   | CREDIT      | 2000   | 5000        |
    #[must_use]
    pub fn standard() -> Self {
        let rule = |source_side, source: (&str, &str), destination: (&str, &str)| PolicyRule {
            source_side,
            source: RoleBinding::shared(source.0, source.1),
            destination: RoleBinding::shared(destination.0, destination.1),
        };
        let deposits = ("customer_deposits", CUSTOMER_DEPOSITS);
        let cash = ("cash", CASH);

        let rules = HashMap::from([
            (
                OperationType::Payment,
                rule(EntryType::Debit, deposits, ("payment_clearing", PAYMENT_CLEARING)),
            ),
            (
                OperationType::Transfer,
                rule(EntryType::Debit, deposits, ("transfer_clearing", TRANSFER_CLEARING)),
            ),
            (OperationType::Deposit, rule(EntryType::Credit, deposits, cash)),
            (OperationType::Withdrawal, rule(EntryType::Debit, deposits, cash)),
            (OperationType::Fee, rule(EntryType::Debit, cash, ("fee_income", FEE_INCOME))),
            (
                OperationType::Interest,
                rule(EntryType::Credit, deposits, ("interest_expense", INTEREST_EXPENSE)),
            ),
        ]);
        Self { rules }
    }

    /// Builds a policy from configuration; an empty table means [`Self::standard`].
    ///
    /// Operation keys and `source_side` are case-insensitive. Operations left out
    /// of a non-empty table have no rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` for an unknown operation or side, or a blank GL code.
    pub fn from_config(config: &HashMap<String, PolicyRuleConfig>) -> Result<Self, LedgerError> {
        if config.is_empty() {
            return Ok(Self::standard());
        }

        let mut rules = HashMap::with_capacity(config.len());
        for (key, raw) in config {
            let operation = OperationType::from_str(key).map_err(LedgerError::InvalidPolicy)?;
            let source_side = EntryType::from_str(&raw.source_side)
                .map_err(|e| LedgerError::InvalidPolicy(format!("{operation}: {e}")))?;
            let rule = PolicyRule {
                source_side,
                source: role_from_config(operation, "source", &raw.source)?,
                destination: role_from_config(operation, "destination", &raw.destination)?,
            };
            rules.insert(operation, rule);
        }
        Ok(Self { rules })
    }

    /// Replaces the rule for one operation.
    #[must_use]
    pub fn with_rule(mut self, operation: OperationType, rule: PolicyRule) -> Self {
        self.rules.insert(operation, rule);
        self
    }

    /// Drops the rule for one operation.
    #[must_use]
    pub fn without_rule(mut self, operation: OperationType) -> Self {
        self.rules.remove(&operation);
        self
    }

    /// Returns the rule for an operation.
    ///
    /// # Errors
    ///
    /// Returns `PolicyNotConfigured` if the operation has no rule.
    pub fn rule(&self, operation: OperationType) -> Result<&PolicyRule, LedgerError> {
        self.rules
            .get(&operation)
            .ok_or_else(|| LedgerError::PolicyNotConfigured(operation.to_string()))
    }

    /// Every GL code the policy can post to, sorted.
    #[must_use]
    pub fn ledger_codes(&self) -> BTreeSet<String> {
        self.rules
            .values()
            .flat_map(|rule| [&rule.source, &rule.destination])
            .flat_map(|binding| {
                std::iter::once(binding.account.clone()).chain(binding.overrides.values().cloned())
            })
            .collect()
    }
}

impl Default for PostingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn role_from_config(
    operation: OperationType,
    side: &str,
    raw: &PolicyRoleConfig,
) -> Result<RoleBinding, LedgerError> {
    let blank = raw.account.trim().is_empty()
        || raw.accounts.values().any(|code| code.trim().is_empty());
    if blank {
        return Err(LedgerError::InvalidPolicy(format!(
            "{operation}: {side} role has a blank GL account"
        )));
    }
    Ok(RoleBinding {
        role: raw.role.clone().unwrap_or_else(|| side.to_string()),
        account: raw.account.clone(),
        overrides: raw.accounts.clone(),
    })
}
