//! Request handlers for the tfstack API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;

use crate::jobs::JobId;
use crate::operation::OperationRequest;

use super::responses::{ApiError, RequestAccepted, RequestStatusResponse};
use super::AppState;

/// Placeholder page for `/`.
pub async fn home() -> &'static str {
    "Nothing to see here"
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /tfstacks`: apply a new stack.
pub async fn create_stack(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = OperationRequest::create(state.tf_dir.clone());
    accept(&state, request).await
}

/// `GET /tfstacks/:resource_id`: list the resources of a stack.
pub async fn read_stack(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = OperationRequest::read(state.tf_dir.clone(), resource_id)?;
    accept(&state, request).await
}

/// `DELETE /tfstacks/:resource_id`: destroy a stack.
pub async fn delete_stack(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = OperationRequest::delete(state.tf_dir.clone(), resource_id)?;
    accept(&state, request).await
}

/// `GET /tfstacks/requests/:request_id`: job status and result.
pub async fn request_status(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
) -> Result<Json<RequestStatusResponse>, ApiError> {
    let id: JobId = request_id.parse()?;

    let record = state
        .dispatcher
        .poll_status(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("unknown request id '{id}'")))?;

    Ok(Json(RequestStatusResponse::from(&record)))
}

async fn accept(
    state: &AppState,
    request: OperationRequest,
) -> Result<(StatusCode, Json<RequestAccepted>), ApiError> {
    let kind = request.kind();
    let request_id = state.dispatcher.enqueue(request).await?;
    debug!(request_id = %request_id, kind = %kind, "request accepted");
    Ok((StatusCode::ACCEPTED, Json(RequestAccepted { request_id })))
}
