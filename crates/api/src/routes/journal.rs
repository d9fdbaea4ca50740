//! Journal entry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use gl_core::LedgerError;
use gl_core::ledger::{EntryType, JournalEntry, JournalLineInput, PostJournalEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, AppState, extractors::ApiJson};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger/journal-entries", post(post_entry))
        .route("/ledger/journal-entries/{reference}", get(get_entry))
        .route(
            "/ledger/journal-entries/{reference}/reversal",
            post(reverse_entry),
        )
}

/// One line of a journal entry request.
#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    /// Ledger account code.
    pub account_code: String,
    /// `DEBIT` or `CREDIT`.
    pub entry_type: EntryType,
    /// Positive amount as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Request body for posting a journal entry.
#[derive(Debug, Deserialize)]
pub struct PostJournalEntryRequest {
    /// Idempotency key.
    pub reference: String,
    /// Free-text description.
    pub description: String,
    /// Accounting date.
    pub value_date: NaiveDate,
    /// Lines in posting order.
    pub lines: Vec<JournalLineRequest>,
}

/// Request body for reversing a journal entry.
#[derive(Debug, Deserialize)]
pub struct ReverseEntryRequest {
    /// Reference of the offsetting entry.
    pub reversal_reference: String,
    /// Accounting date of the offsetting entry.
    pub value_date: NaiveDate,
    /// Defaults to `Reversal of <reference>`.
    pub description: Option<String>,
}

/// One line of a journal entry response.
#[derive(Debug, Serialize)]
pub struct JournalLineResponse {
    /// 1-based position.
    pub line_no: i32,
    /// Ledger account code.
    pub account_code: String,
    /// `DEBIT` or `CREDIT`.
    pub entry_type: EntryType,
    /// Amount.
    pub amount: Decimal,
}

/// Response for a journal entry.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Idempotency key.
    pub reference: String,
    /// Description.
    pub description: String,
    /// Accounting date.
    pub value_date: NaiveDate,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
    /// Sum of debit lines.
    pub total_debit: Decimal,
    /// Sum of credit lines.
    pub total_credit: Decimal,
    /// Lines in posting order.
    pub lines: Vec<JournalLineResponse>,
}

impl TryFrom<JournalEntry> for JournalEntryResponse {
    type Error = LedgerError;

    fn try_from(entry: JournalEntry) -> Result<Self, Self::Error> {
        let totals = entry.totals()?;
        Ok(Self {
            id: entry.id.into_inner(),
            reference: entry.reference,
            description: entry.description,
            value_date: entry.value_date,
            created_at: entry.created_at,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            lines: entry
                .lines
                .into_iter()
                .map(|line| JournalLineResponse {
                    line_no: line.line_no,
                    account_code: line.account_code,
                    entry_type: line.entry_type,
                    amount: line.amount,
                })
                .collect(),
        })
    }
}

/// POST `/ledger/journal-entries` - Post a balanced journal entry.
async fn post_entry(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PostJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), ApiError> {
    let input = PostJournalEntry {
        reference: payload.reference,
        description: payload.description,
        value_date: payload.value_date,
        lines: payload
            .lines
            .into_iter()
            .map(|line| JournalLineInput {
                account_code: line.account_code,
                entry_type: line.entry_type,
                amount: line.amount,
            })
            .collect(),
    };
    let entry = state.composer.post(input).await?;

    Ok((StatusCode::CREATED, Json(JournalEntryResponse::try_from(entry)?)))
}

/// GET `/ledger/journal-entries/{reference}` - Get a posted entry.
async fn get_entry(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    let entry = state.composer.get_entry(&reference).await?;
    Ok(Json(JournalEntryResponse::try_from(entry)?))
}

/// POST `/ledger/journal-entries/{reference}/reversal` - Post an offsetting entry.
async fn reverse_entry(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    ApiJson(payload): ApiJson<ReverseEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), ApiError> {
    let entry = state
        .composer
        .reverse(
            &reference,
            &payload.reversal_reference,
            payload.value_date,
            payload.description.as_deref(),
        )
        .await?;
    info!(original = %reference, reversal = %entry.reference, "Reversal posted via API");

    Ok((StatusCode::CREATED, Json(JournalEntryResponse::try_from(entry)?)))
}
