//! Posting policy mapper.
//!
//! The sole integration point other services use: they describe a business
//! operation and never construct raw lines themselves.

use std::sync::Arc;

use tracing::{debug, info};

use super::standard::PostingPolicy;
use super::types::{PolicyPostingRequest, PolicyRule};
use crate::ledger::types::{JournalEntry, JournalLineInput, PostJournalEntry};
use crate::ledger::{JournalComposer, LedgerError};

/// Synthesizes the two lines a rule produces for a request.
///
/// The source account lands on `rule.source_side`, the destination on the
/// opposite side, both for the full amount.
#[must_use]
pub fn synthesize_lines(rule: &PolicyRule, request: &PolicyPostingRequest) -> [JournalLineInput; 2] {
    let source_code = rule.source.resolve(Some(&request.source_account_ref));
    let destination_code = rule
        .destination
        .resolve(request.destination_account_ref.as_deref());

    [
        JournalLineInput {
            account_code: source_code.to_string(),
            entry_type: rule.source_side,
            amount: request.amount,
        },
        JournalLineInput {
            account_code: destination_code.to_string(),
            entry_type: rule.source_side.opposite(),
            amount: request.amount,
        },
    ]
}

/// Turns business posting requests into journal entries.
#[derive(Clone)]
pub struct PostingPolicyMapper {
    composer: JournalComposer,
    policy: Arc<PostingPolicy>,
}

impl PostingPolicyMapper {
    /// Creates a mapper.
    #[must_use]
    pub fn new(composer: JournalComposer, policy: Arc<PostingPolicy>) -> Self {
        Self { composer, policy }
    }

    /// Returns the policy in use.
    #[must_use]
    pub fn policy(&self) -> &PostingPolicy {
        &self.policy
    }

    /// Validates the request, synthesizes two lines and posts them.
    ///
    /// An already-posted reference fails with `DuplicateReference` before the
    /// request fields are checked, so retries are recognised as such. Composer errors (`DuplicateReference`, `AccountNotFound`, `UnbalancedEntry`, ...)
    /// propagate unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPostingRequest` for a malformed request,
    /// `PolicyNotConfigured` when the operation has no rule, or any composer error.
    pub async fn post_policy_entry(
        &self,
        request: PolicyPostingRequest,
    ) -> Result<JournalEntry, LedgerError> {
        self.composer.ensure_unposted(&request.reference).await?;
        request.validate()?;

        let rule = self.policy.rule(request.operation_type)?;
        let lines = synthesize_lines(rule, &request);
        debug!(
            reference = %request.reference,
            operation = %request.operation_type,
            source = %lines[0].account_code,
            destination = %lines[1].account_code,
            "Resolved posting policy"
        );

        let operation = request.operation_type;
        let entry = self
            .composer
            .post(PostJournalEntry {
                reference: request.reference,
                description: request.description,
                value_date: request.value_date,
                lines: lines.to_vec(),
            })
            .await?;

        info!(
            reference = %entry.reference,
            operation = %operation,
            "Policy entry posted"
        );
        Ok(entry)
    }
}
