//! Remote posting gateway against live HTTP servers.
//!
//! Each test binds an ephemeral port and serves either the ledger API itself or
//! a stub answering with a crafted response.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::post};
use chrono::NaiveDate;
use gl_api::{AppState, create_router};
use gl_core::LedgerError;
use gl_core::ledger::{AccountDirectory, InMemoryLedgerStore};
use gl_core::policy::{OperationType, PolicyPostingRequest, PostingPolicy, standard_chart};
use gl_gateway::{PostingGateway, PostingOutcome, RemotePostingGateway};
use rust_decimal_macros::dec;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// A stub whose posting endpoint always answers with `status` and `body`.
    async fn stub(status: StatusCode, body: &'static str) -> Self {
        let app = Router::new().route(
            "/api/v1/ledger/postings",
            post(move || async move { (status, body) }),
        );
        Self::spawn(app).await
    }

    fn gateway(&self, timeout: Duration) -> RemotePostingGateway {
        RemotePostingGateway::new(&self.base_url, timeout).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn ledger_server() -> (TestServer, Arc<InMemoryLedgerStore>) {
    let store = Arc::new(InMemoryLedgerStore::new());
    let directory = AccountDirectory::new(store.clone());
    for account in standard_chart() {
        directory.create_account(account).await.unwrap();
    }
    let state = AppState::new(store.clone(), store.clone(), Arc::new(PostingPolicy::standard()));
    (TestServer::spawn(create_router(state)).await, store)
}

fn fee(reference: &str) -> PolicyPostingRequest {
    PolicyPostingRequest {
        reference: reference.to_string(),
        description: "Monthly account fee".to_string(),
        value_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        operation_type: OperationType::Fee,
        amount: dec!(6.00),
        source_account_ref: "1000".to_string(),
        destination_account_ref: None,
    }
}

fn failure_message(result: Result<PostingOutcome, LedgerError>) -> String {
    match result {
        Err(LedgerError::LedgerPostingFailed(message)) => message,
        other => panic!("expected LedgerPostingFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_posts_to_ledger_api() {
    let (server, store) = ledger_server().await;
    let gateway = server.gateway(Duration::from_secs(5));

    let outcome = gateway.submit(fee("FEE-1")).await.unwrap();
    assert!(matches!(
        outcome,
        PostingOutcome::Posted { ref reference, entry_id: Some(_) } if reference == "FEE-1"
    ));
    assert_eq!(store.entry_count().unwrap(), 1);
}

#[tokio::test]
async fn test_remote_duplicate_becomes_posting_failure() {
    let (server, store) = ledger_server().await;
    let gateway = server.gateway(Duration::from_secs(5));

    gateway.submit(fee("FEE-2")).await.unwrap();
    let message = failure_message(gateway.submit(fee("FEE-2")).await);
    assert!(message.contains("FEE-2"), "{message}");
    assert!(message.contains("already been posted"), "{message}");
    assert_eq!(store.entry_count().unwrap(), 1);
}

#[tokio::test]
async fn test_error_body_message_is_extracted() {
    let server = TestServer::stub(StatusCode::BAD_REQUEST, r#"{"message":"unbalanced"}"#).await;
    let message = failure_message(
        server
            .gateway(Duration::from_secs(5))
            .submit(fee("FEE-3"))
            .await,
    );
    assert!(message.contains("unbalanced"));
}

#[tokio::test]
async fn test_empty_error_body_gives_generic_message() {
    let server = TestServer::stub(StatusCode::INTERNAL_SERVER_ERROR, "").await;
    let message = failure_message(
        server
            .gateway(Duration::from_secs(5))
            .submit(fee("FEE-4"))
            .await,
    );
    assert_eq!(message, "ledger service responded with HTTP 500");
}

#[tokio::test]
async fn test_malformed_error_body_gives_generic_message() {
    let server = TestServer::stub(StatusCode::BAD_GATEWAY, "{\"message\": ").await;
    let message = failure_message(
        server
            .gateway(Duration::from_secs(5))
            .submit(fee("FEE-5"))
            .await,
    );
    assert_eq!(message, "ledger service responded with HTTP 502");
}

#[tokio::test]
async fn test_success_without_body() {
    let server = TestServer::stub(StatusCode::NO_CONTENT, "").await;
    let outcome = server
        .gateway(Duration::from_secs(5))
        .submit(fee("FEE-6"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PostingOutcome::Posted {
            reference: "FEE-6".to_string(),
            entry_id: None
        }
    );
}

#[tokio::test]
async fn test_timeout_is_posting_failure() {
    let app = Router::new().route(
        "/api/v1/ledger/postings",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::CREATED
        }),
    );
    let server = TestServer::spawn(app).await;

    let message = failure_message(
        server
            .gateway(Duration::from_millis(100))
            .submit(fee("FEE-7"))
            .await,
    );
    assert!(message.contains("100 ms"), "{message}");
}

#[tokio::test]
async fn test_connection_refused_is_posting_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway =
        RemotePostingGateway::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let message = failure_message(gateway.submit(fee("FEE-8")).await);
    assert_eq!(message, "ledger service unreachable");
}
