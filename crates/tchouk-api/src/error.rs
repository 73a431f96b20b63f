use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tchouk_store::StoreError;
use tchouk_types::api::StatusMessage;
use tchouk_types::id::ParseIdError;
use tracing::error;

/// Handler failure taxonomy. Renders as the `{code, message}` envelope with
/// the matching HTTP status.
#[derive(Debug)]
pub enum ApiError {
    /// 404 — no record with the given identifier or name.
    NotFound(&'static str),
    /// 422 — the payload decoded but a required field is missing or invalid.
    Validation(String),
    /// 400 — malformed payload or identifier.
    BadRequest(String),
    /// 401 — missing or invalid credential.
    Unauthorized(&'static str),
    /// 500 — the store or some other dependency failed.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::Unauthorized(msg) => msg.to_string(),
            ApiError::Validation(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(msg) = &self {
            error!("request failed: {msg}");
        }
        let status = self.status();
        let body = StatusMessage {
            code: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("record not found"),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ParseIdError> for ApiError {
    fn from(err: ParseIdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Collapse a store miss into a resource-specific 404, passing any other
/// failure through unchanged.
pub fn or_not_found(err: StoreError, what: &'static str) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::NotFound(what),
        other => other.into(),
    }
}
