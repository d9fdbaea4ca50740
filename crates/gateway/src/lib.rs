//! Posting gateways.
//!
//! Payment, fee and interest services submit [`PolicyPostingRequest`]s through a
//! [`PostingGateway`] and never learn whether the ledger runs in the same process,
//! behind HTTP, or not at all:
//! - [`LocalPostingGateway`] calls the posting policy mapper directly
//! - [`RemotePostingGateway`] calls `POST /api/v1/ledger/postings` on a ledger service
//! - [`DisabledPostingGateway`] acknowledges requests without posting

mod disabled;
mod local;
mod remote;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gl_core::LedgerError;
use gl_core::policy::{PolicyPostingRequest, PostingPolicyMapper};
use gl_shared::config::{GatewayMode, PostingConfig};
use gl_shared::types::JournalEntryId;

pub use disabled::DisabledPostingGateway;
pub use local::LocalPostingGateway;
pub use remote::RemotePostingGateway;

/// What happened to a submitted posting request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingOutcome {
    /// The ledger accepted the entry.
    Posted {
        /// Reference of the posted entry.
        reference: String,
        /// Entry ID, when the ledger reported one.
        entry_id: Option<JournalEntryId>,
    },
    /// Posting is disabled; nothing was written.
    Skipped {
        /// Reference of the request.
        reference: String,
    },
}

impl PostingOutcome {
    /// Reference of the request this outcome answers.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Posted { reference, .. } | Self::Skipped { reference } => reference,
        }
    }
}

/// Submits policy posting requests to the ledger.
#[async_trait]
pub trait PostingGateway: Send + Sync {
    /// Submits one request.
    ///
    /// # Errors
    ///
    /// The local gateway returns the ledger's own errors unchanged; the remote
    /// gateway reports every failure as `LedgerPostingFailed`.
    async fn submit(&self, request: PolicyPostingRequest) -> Result<PostingOutcome, LedgerError>;
}

/// Builds the gateway selected by configuration.
///
/// `mapper` is only needed in local mode.
///
/// # Errors
///
/// Returns `Internal` when local mode has no mapper, remote mode has no URL,
/// or the HTTP client cannot be created.
pub fn build_gateway(
    config: &PostingConfig,
    mapper: Option<PostingPolicyMapper>,
) -> Result<Arc<dyn PostingGateway>, LedgerError> {
    if !config.enabled {
        return Ok(Arc::new(DisabledPostingGateway));
    }

    match config.mode {
        GatewayMode::Local => {
            let mapper = mapper.ok_or_else(|| {
                LedgerError::Internal("local posting mode needs an in-process ledger".to_string())
            })?;
            Ok(Arc::new(LocalPostingGateway::new(mapper)))
        }
        GatewayMode::Remote => {
            let url = config.remote_url.as_deref().ok_or_else(|| {
                LedgerError::Internal(
                    "remote posting mode needs ledger.posting.remote_url".to_string(),
                )
            })?;
            let gateway =
                RemotePostingGateway::new(url, Duration::from_millis(config.timeout_ms))?;
            Ok(Arc::new(gateway))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gl_core::policy::OperationType;
    use rust_decimal_macros::dec;

    fn request() -> PolicyPostingRequest {
        PolicyPostingRequest {
            reference: "FEE-1".to_string(),
            description: "Card fee".to_string(),
            value_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            operation_type: OperationType::Fee,
            amount: dec!(6.00),
            source_account_ref: "1000".to_string(),
            destination_account_ref: None,
        }
    }

    #[tokio::test]
    async fn test_disabled_config_skips() {
        let config = PostingConfig {
            enabled: false,
            ..PostingConfig::default()
        };
        let gateway = build_gateway(&config, None).unwrap();
        let outcome = gateway.submit(request()).await.unwrap();
        assert_eq!(
            outcome,
            PostingOutcome::Skipped {
                reference: "FEE-1".to_string()
            }
        );
    }

    #[test]
    fn test_local_mode_requires_mapper() {
        let err = build_gateway(&PostingConfig::default(), None).err().unwrap();
        assert!(matches!(err, LedgerError::Internal(_)));
    }

    #[test]
    fn test_remote_mode_requires_url() {
        let config = PostingConfig {
            mode: GatewayMode::Remote,
            ..PostingConfig::default()
        };
        assert!(matches!(
            build_gateway(&config, None),
            Err(LedgerError::Internal(_))
        ));

        let config = PostingConfig {
            mode: GatewayMode::Remote,
            remote_url: Some("http://ledger.internal:8080".to_string()),
            ..PostingConfig::default()
        };
        assert!(build_gateway(&config, None).is_ok());
    }

    #[test]
    fn test_outcome_reference() {
        let outcome = PostingOutcome::Posted {
            reference: "PAY-1".to_string(),
            entry_id: None,
        };
        assert_eq!(outcome.reference(), "PAY-1");
    }
}
