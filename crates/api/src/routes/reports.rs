//! Reconciliation and trial balance routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::NaiveDate;
use gl_core::ledger::{Reconciliation, TrialBalance};
use serde::Deserialize;

use crate::{ApiError, AppState, extractors::ApiQuery};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger/reconciliation", get(reconcile))
        .route("/ledger/trial-balance", get(trial_balance))
}

/// Query parameters for reconciliation.
#[derive(Debug, Deserialize)]
pub struct ReconciliationQuery {
    /// Inclusive start date (YYYY-MM-DD).
    pub from: NaiveDate,
    /// Inclusive end date (YYYY-MM-DD).
    pub to: NaiveDate,
}

/// GET `/ledger/reconciliation?from=&to=` - Debit/credit check over a value-date range.
async fn reconcile(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReconciliationQuery>,
) -> Result<Json<Reconciliation>, ApiError> {
    Ok(Json(state.query.reconcile(query.from, query.to).await?))
}

/// GET `/ledger/trial-balance` - Every account's totals ordered by code.
async fn trial_balance(State(state): State<AppState>) -> Result<Json<TrialBalance>, ApiError> {
    Ok(Json(state.query.trial_balance().await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{TestApp, get, post};

    async fn seeded() -> TestApp {
        let app = TestApp::new().await;
        for (reference, date, amount) in [
            ("DEP-1", "2026-05-01", "100.00"),
            ("DEP-2", "2026-05-15", "40.00"),
            ("DEP-3", "2026-06-01", "7.00"),
        ] {
            let (status, _) = app
                .send(post(
                    "/api/v1/ledger/journal-entries",
                    &json!({
                        "reference": reference,
                        "description": "Cash deposit",
                        "value_date": date,
                        "lines": [
                            { "account_code": "1000", "entry_type": "DEBIT", "amount": amount },
                            { "account_code": "2000", "entry_type": "CREDIT", "amount": amount }
                        ]
                    }),
                ))
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        app
    }

    #[tokio::test]
    async fn test_reconcile_window() {
        let app = seeded().await;
        let (status, body) = app
            .send(get("/api/v1/ledger/reconciliation?from=2026-05-01&to=2026-05-31"))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balanced"], true);
        assert_eq!(body["entry_count"], 2);
        assert_eq!(body["total_debit"], "140.00");
        assert_eq!(body["from_date"], "2026-05-01");
    }

    #[tokio::test]
    async fn test_reconcile_inverted_range() {
        let app = seeded().await;
        let (status, body) = app
            .send(get("/api/v1/ledger/reconciliation?from=2026-06-01&to=2026-05-01"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_reconcile_bad_query() {
        let app = seeded().await;
        let (status, body) = app
            .send(get("/api/v1/ledger/reconciliation?from=yesterday"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_trial_balance() {
        let app = seeded().await;
        let (status, body) = app.send(get("/api/v1/ledger/trial-balance")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balanced"], true);
        assert_eq!(body["total_debit"], "147.00");
        assert_eq!(body["rows"].as_array().unwrap().len(), 7);
        assert_eq!(body["rows"][2]["code"], "2000");
        assert_eq!(body["rows"][2]["natural_balance"], "147.00");
    }
}
