//! HTTP API.
//!
//! Provides endpoints for:
//! - Creating a stack (`POST /tfstacks`)
//! - Reading / deleting a stack (`GET|DELETE /tfstacks/:resource_id`)
//! - Polling a request (`GET /tfstacks/requests/:request_id`)
//! - Health check (`/health`)
//!
//! Every operation is enqueued on the [`JobDispatcher`] and answered with
//! `202 Accepted` and a request id.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::jobs::JobDispatcher;

mod handlers;
pub mod responses;

/// Shared handler state.
pub struct AppState {
    pub dispatcher: Arc<dyn JobDispatcher>,
    /// Working directory passed to every operation.
    pub tf_dir: PathBuf,
}

impl AppState {
    pub fn new(dispatcher: Arc<dyn JobDispatcher>, tf_dir: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            tf_dir: tf_dir.into(),
        })
    }
}

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/tfstacks", post(handlers::create_stack))
        .route(
            "/tfstacks/:resource_id",
            get(handlers::read_stack).delete(handlers::delete_stack),
        )
        .route("/tfstacks/requests/:request_id", get(handlers::request_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
