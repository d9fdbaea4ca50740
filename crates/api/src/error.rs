//! API error responses.
//!
//! Every failed request answers with `{"error": "<CODE>", "message": "<text>"}`.
//! Internal failures are logged here and reach the caller only as an opaque message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gl_core::LedgerError;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

/// An error rendered as a JSON response.
#[derive(Debug)]
pub enum ApiError {
    /// A ledger error, mapped by its own code and status.
    Ledger(LedgerError),
    /// The request body or query string could not be decoded.
    BadRequest {
        /// HTTP status chosen by the extractor.
        status: StatusCode,
        /// Decoder message.
        message: String,
    },
}

impl ApiError {
    /// Wraps validator failures as the given ledger error kind.
    pub fn invalid(
        kind: fn(String) -> LedgerError,
    ) -> impl FnOnce(ValidationErrors) -> Self {
        move |errors| Self::Ledger(kind(describe(&errors)))
    }
}

/// Flattens validation errors into `field: message` pairs.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    if parts.is_empty() {
        // Only nested (list or struct) errors.
        return errors.to_string();
    }
    parts.sort();
    parts.join("; ")
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Ledger(err) => {
                if err.is_internal() {
                    error!(error = %err, code = err.error_code(), "Request failed");
                }
                let status = StatusCode::from_u16(err.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    status,
                    Json(json!({
                        "error": err.error_code(),
                        "message": err.public_message()
                    })),
                )
                    .into_response()
            }
            Self::BadRequest { status, message } => (
                status,
                Json(json!({
                    "error": "INVALID_REQUEST",
                    "message": message
                })),
            )
                .into_response(),
        }
    }
}
