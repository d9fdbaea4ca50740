//! Request extractors whose rejections use the API error shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::ApiError;

/// JSON body extractor; a malformed body answers with `INVALID_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor; a malformed query answers with `INVALID_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
