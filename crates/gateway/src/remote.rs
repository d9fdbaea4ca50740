//! HTTP posting gateway.

use std::time::Duration;

use async_trait::async_trait;
use gl_core::LedgerError;
use gl_core::policy::PolicyPostingRequest;
use gl_shared::types::JournalEntryId;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{PostingGateway, PostingOutcome};

const POSTINGS_PATH: &str = "/api/v1/ledger/postings";

/// Error body returned by the ledger service; only `message` is relied on.
#[derive(Debug, Deserialize)]
struct RemoteError {
    message: Option<String>,
}

/// Success body returned by the ledger service, when there is one.
#[derive(Debug, Deserialize)]
struct RemotePosted {
    entry_id: Option<Uuid>,
}

/// Posts through a ledger service over HTTP with a bounded timeout.
///
/// Every failure, including timeouts and unreadable responses, becomes
/// `LedgerPostingFailed`; the message is the remote `message` when one can be
/// parsed, otherwise a generic description.
#[derive(Debug, Clone)]
pub struct RemotePostingGateway {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl RemotePostingGateway {
    /// Creates a gateway for the ledger service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}{POSTINGS_PATH}", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    /// The URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_failure(&self, err: &reqwest::Error) -> LedgerError {
        let message = if err.is_timeout() {
            format!("ledger service did not answer within {} ms", self.timeout.as_millis())
        } else {
            "ledger service unreachable".to_string()
        };
        warn!(endpoint = %self.endpoint, error = %err, "Remote posting transport failure");
        LedgerError::LedgerPostingFailed(message)
    }
}

/// Extracts the remote message from an error body, if there is a usable one.
fn remote_message(body: &str) -> Option<String> {
    serde_json::from_str::<RemoteError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
}

fn generic_failure(status: StatusCode) -> String {
    format!("ledger service responded with HTTP {}", status.as_u16())
}

#[async_trait]
impl PostingGateway for RemotePostingGateway {
    async fn submit(&self, request: PolicyPostingRequest) -> Result<PostingOutcome, LedgerError> {
        let reference = request.reference.clone();
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_failure(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_failure(&e))?;

        if !status.is_success() {
            let message = remote_message(&body).unwrap_or_else(|| generic_failure(status));
            warn!(
                reference = %reference,
                status = status.as_u16(),
                message = %message,
                "Remote posting rejected"
            );
            return Err(LedgerError::LedgerPostingFailed(message));
        }

        // A success body is optional.
        let entry_id = serde_json::from_str::<RemotePosted>(&body)
            .ok()
            .and_then(|p| p.entry_id)
            .map(JournalEntryId::from_uuid);
        debug!(reference = %reference, status = status.as_u16(), "Remote posting accepted");

        Ok(PostingOutcome::Posted {
            reference,
            entry_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let gateway =
            RemotePostingGateway::new("http://ledger:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.endpoint(), "http://ledger:8080/api/v1/ledger/postings");
    }

    #[test]
    fn test_remote_message_parsing() {
        assert_eq!(
            remote_message(r#"{"error":"UNBALANCED_ENTRY","message":"unbalanced"}"#).as_deref(),
            Some("unbalanced")
        );
        assert_eq!(remote_message(""), None);
        assert_eq!(remote_message("<html>502</html>"), None);
        assert_eq!(remote_message(r#"{"message":"  "}"#), None);
        assert_eq!(remote_message(r#"{"message":42}"#), None);
        assert_eq!(remote_message(r#"{"error":"X"}"#), None);
    }
}
