//! Status and version endpoint handlers

use axum::{
  extract::{Extension, State},
  response::Json,
};

use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{BaseResponse, StatusResponse, VersionResponse};

/// GET /status - Health check endpoint
pub async fn status(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Json<BaseResponse<StatusResponse>> {
  let response = StatusResponse {
    status: "healthy".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    embedding_cache_entries: state.orchestrator.embeddings().cache_len(),
    database_connected: state.orchestrator.database_connected().await,
    active_sessions: state.sessions.active_count().await,
  };

  Json(BaseResponse::success(response, context.request_id))
}

/// GET /version - Returns current API version
pub async fn version(
  Extension(context): Extension<RequestContext>,
) -> Json<BaseResponse<VersionResponse>> {
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };
  Json(BaseResponse::success(response, context.request_id))
}
