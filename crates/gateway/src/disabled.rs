//! No-op posting gateway for deployments without ledger integration.

use async_trait::async_trait;
use gl_core::LedgerError;
use gl_core::policy::PolicyPostingRequest;
use tracing::debug;

use crate::{PostingGateway, PostingOutcome};

/// Acknowledges every request as [`PostingOutcome::Skipped`] without posting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPostingGateway;

#[async_trait]
impl PostingGateway for DisabledPostingGateway {
    async fn submit(&self, request: PolicyPostingRequest) -> Result<PostingOutcome, LedgerError> {
        debug!(
            reference = %request.reference,
            operation = %request.operation_type,
            "Ledger posting disabled, request skipped"
        );
        Ok(PostingOutcome::Skipped {
            reference: request.reference,
        })
    }
}
