//! Logs endpoint handler

use axum::{
  extract::{Extension, Query},
  http::StatusCode,
  response::Json,
};
use bentley::Level;

use crate::server::handlers::{failure, unauthenticated, ApiFailure};
use crate::server::middleware::{CurrentSession, RequestContext};
use crate::server::types::{ApiError, BaseResponse, LogsQuery, LogsResponse};

const DEFAULT_LIMIT: usize = 100;

/// GET /logs - Recent request log entries, newest last
pub async fn get_logs(
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
  Query(params): Query<LogsQuery>,
) -> Result<Json<BaseResponse<LogsResponse>>, ApiFailure> {
  let transaction_id = context.request_id;

  if !session.is_authenticated() {
    return Err(unauthenticated(transaction_id));
  }

  let level = match params.level.as_deref() {
    None | Some("all") => None,
    Some(raw) => match raw.parse::<Level>() {
      Ok(level) => Some(level),
      Err(_) => {
        let error = ApiError::new("invalid_log_level", &format!("Unknown log level: {raw}"))
          .with_context(serde_json::json!({ "level": raw }));
        return Err(failure(StatusCode::BAD_REQUEST, error, transaction_id));
      }
    },
  };

  let logs = context.logger.get_logs(Some(params.limit.unwrap_or(DEFAULT_LIMIT)), level).await;
  Ok(Json(BaseResponse::success(LogsResponse { logs }, transaction_id)))
}
