//! In-process posting gateway.

use async_trait::async_trait;
use gl_core::LedgerError;
use gl_core::policy::{PolicyPostingRequest, PostingPolicyMapper};

use crate::{PostingGateway, PostingOutcome};

/// Posts through the policy mapper in the same process.
#[derive(Clone)]
pub struct LocalPostingGateway {
    mapper: PostingPolicyMapper,
}

impl LocalPostingGateway {
    /// Creates a gateway over a mapper.
    #[must_use]
    pub fn new(mapper: PostingPolicyMapper) -> Self {
        Self { mapper }
    }
}

#[async_trait]
impl PostingGateway for LocalPostingGateway {
    async fn submit(&self, request: PolicyPostingRequest) -> Result<PostingOutcome, LedgerError> {
        let entry = self.mapper.post_policy_entry(request).await?;
        Ok(PostingOutcome::Posted {
            reference: entry.reference,
            entry_id: Some(entry.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gl_core::ledger::{AccountDirectory, InMemoryLedgerStore, JournalComposer};
    use gl_core::policy::{OperationType, PostingPolicy, standard_chart};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn gateway() -> (LocalPostingGateway, Arc<InMemoryLedgerStore>) {
        let store = Arc::new(InMemoryLedgerStore::new());
        let directory = AccountDirectory::new(store.clone());
        for account in standard_chart() {
            directory.create_account(account).await.unwrap();
        }
        let composer = JournalComposer::new(directory, store.clone());
        let mapper = PostingPolicyMapper::new(composer, Arc::new(PostingPolicy::standard()));
        (LocalPostingGateway::new(mapper), store)
    }

    fn payment(reference: &str) -> PolicyPostingRequest {
        PolicyPostingRequest {
            reference: reference.to_string(),
            description: "Card payment".to_string(),
            value_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            operation_type: OperationType::Payment,
            amount: dec!(42.10),
            source_account_ref: "ACC-000123".to_string(),
            destination_account_ref: Some("MERCHANT-9".to_string()),
        }
    }

    #[tokio::test]
    async fn test_local_posts_entry() {
        let (gateway, store) = gateway().await;
        let outcome = gateway.submit(payment("PAY-1")).await.unwrap();

        assert!(matches!(
            outcome,
            PostingOutcome::Posted { ref reference, entry_id: Some(_) } if reference == "PAY-1"
        ));
        assert_eq!(store.entry_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_local_propagates_ledger_errors_unchanged() {
        let (gateway, _) = gateway().await;
        gateway.submit(payment("PAY-2")).await.unwrap();
        let err = gateway.submit(payment("PAY-2")).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateReference(r) if r == "PAY-2"));
    }
}
