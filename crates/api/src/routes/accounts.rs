//! Ledger account administration routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use gl_core::LedgerError;
use gl_core::ledger::{AccountBalance, AccountType, LedgerAccount, NewLedgerAccount};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiError, AppState, extractors::ApiJson};

/// Creates the ledger account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger/accounts", get(list_accounts).post(create_account))
        .route("/ledger/accounts/{code}", get(get_account))
        .route("/ledger/accounts/{code}/deactivate", post(deactivate_account))
        .route("/ledger/accounts/{code}/activate", post(activate_account))
        .route("/ledger/accounts/{code}/balance", get(get_balance))
}

/// Request body for creating a ledger account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Account code, unique across the ledger.
    #[validate(length(min = 1, max = 32, message = "must be 1 to 32 characters"))]
    pub code: String,
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub name: String,
    /// Account class: asset, liability, equity, income, expense.
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Response for a ledger account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account class.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Whether lines may be posted to the account.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<LedgerAccount> for AccountResponse {
    fn from(account: LedgerAccount) -> Self {
        Self {
            id: account.id.into_inner(),
            code: account.code,
            name: account.name,
            account_type: account.account_type,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

/// Response for the account list.
#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    /// Accounts ordered by code.
    pub accounts: Vec<AccountResponse>,
}

/// GET `/ledger/accounts` - List all accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<AccountListResponse>, ApiError> {
    let accounts = state.accounts.list_all().await?;
    Ok(Json(AccountListResponse {
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}

/// POST `/ledger/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    payload
        .validate()
        .map_err(ApiError::invalid(LedgerError::InvalidAccount))?;
    let account_type =
        AccountType::from_str(&payload.account_type).map_err(LedgerError::InvalidAccount)?;

    let account = state
        .accounts
        .create_account(NewLedgerAccount::new(payload.code, payload.name, account_type))
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET `/ledger/accounts/{code}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.get_by_code(&code).await?;
    Ok(Json(account.into()))
}

/// POST `/ledger/accounts/{code}/deactivate` - Stop accepting lines for an account.
async fn deactivate_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.deactivate(&code).await?;
    info!(code = %account.code, "Account deactivated via API");
    Ok(Json(account.into()))
}

/// POST `/ledger/accounts/{code}/activate` - Accept lines for an account again.
async fn activate_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.activate(&code).await?;
    info!(code = %account.code, "Account activated via API");
    Ok(Json(account.into()))
}

/// GET `/ledger/accounts/{code}/balance` - Debit/credit totals over all lines.
async fn get_balance(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountBalance>, ApiError> {
    Ok(Json(state.query.get_balance(&code).await?))
}
