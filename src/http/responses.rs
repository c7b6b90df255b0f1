//! Response bodies and error mapping for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::errors::TfstackError;
use crate::jobs::{JobId, JobRecord};
use crate::types::JobStatus;

/// Body returned when an operation has been accepted.
#[derive(Debug, Serialize)]
pub struct RequestAccepted {
    pub request_id: JobId,
}

/// Body returned by the request status lookup.
#[derive(Debug, Serialize)]
pub struct RequestStatusResponse {
    pub request_id: JobId,
    pub request_status: JobStatus,
    /// Payload object or error string once terminal; `null` before that.
    pub request_result: serde_json::Value,
}

impl From<&JobRecord> for RequestStatusResponse {
    fn from(record: &JobRecord) -> Self {
        Self {
            request_id: record.id(),
            request_status: record.status(),
            request_result: record
                .result()
                .map(|r| r.to_json())
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<TfstackError> for ApiError {
    fn from(err: TfstackError) -> Self {
        match err {
            TfstackError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
