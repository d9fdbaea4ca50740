//! Policy posting route, the endpoint remote posting gateways call.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::NaiveDate;
use gl_core::policy::{OperationType, PolicyPostingRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, AppState, extractors::ApiJson};

/// Creates the posting routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ledger/postings", post(post_policy_entry))
}

/// Request body for a policy posting.
#[derive(Debug, Deserialize)]
pub struct PolicyPostingRequestBody {
    /// Idempotency key.
    pub reference: String,
    /// Free-text description.
    pub description: String,
    /// Accounting date.
    pub value_date: NaiveDate,
    /// Business operation.
    pub operation_type: OperationType,
    /// Positive amount as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// External identifier of the source account.
    pub source_account_ref: String,
    /// External identifier of the destination account.
    pub destination_account_ref: Option<String>,
}

impl From<PolicyPostingRequestBody> for PolicyPostingRequest {
    fn from(body: PolicyPostingRequestBody) -> Self {
        Self {
            reference: body.reference,
            description: body.description,
            value_date: body.value_date,
            operation_type: body.operation_type,
            amount: body.amount,
            source_account_ref: body.source_account_ref,
            destination_account_ref: body.destination_account_ref,
        }
    }
}

/// Response for an accepted policy posting.
#[derive(Debug, Serialize, Deserialize)]
pub struct PostingResponse {
    /// ID of the journal entry created.
    pub entry_id: Uuid,
    /// Reference of the journal entry created.
    pub reference: String,
}

/// POST `/ledger/postings` - Post a business operation through the posting policy.
async fn post_policy_entry(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PolicyPostingRequestBody>,
) -> Result<(StatusCode, Json<PostingResponse>), ApiError> {
    let entry = state.mapper.post_policy_entry(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostingResponse {
            entry_id: entry.id.into_inner(),
            reference: entry.reference,
        }),
    ))
}
