//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Ledger account administration routes
//! - Journal entry and policy posting routes
//! - Balance, reconciliation and trial balance routes
//! - The JSON error contract shared by every route

pub mod error;
pub mod extractors;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::Router;
use gl_core::ledger::{AccountDirectory, AccountStore, BalanceQuery, JournalComposer, JournalStore};
use gl_core::policy::{PostingPolicy, PostingPolicyMapper};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger account directory.
    pub accounts: AccountDirectory,
    /// The single writer of journal entries.
    pub composer: JournalComposer,
    /// Operation-type postings.
    pub mapper: PostingPolicyMapper,
    /// Balance and reconciliation queries.
    pub query: BalanceQuery,
}

impl AppState {
    /// Wires the ledger services over the given stores.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        journal: Arc<dyn JournalStore>,
        policy: Arc<PostingPolicy>,
    ) -> Self {
        let directory = AccountDirectory::new(accounts);
        let composer = JournalComposer::new(directory.clone(), journal.clone());
        Self {
            mapper: PostingPolicyMapper::new(composer.clone(), policy),
            query: BalanceQuery::new(directory.clone(), journal),
            accounts: directory,
            composer,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
