//! Route handlers

pub mod api;
pub mod logs;
pub mod pages;
pub mod status;

use axum::{http::StatusCode, response::Json};
use uuid::Uuid;

use crate::error::SearchError;
use crate::server::types::{ApiError, BaseResponse};

/// Error half of every JSON handler's result
pub type ApiFailure = (StatusCode, Json<BaseResponse<()>>);

pub(crate) fn failure(status: StatusCode, error: ApiError, transaction_id: Uuid) -> ApiFailure {
  (status, Json(BaseResponse::<()>::error(vec![error], transaction_id)))
}

pub(crate) fn search_failure(error: &SearchError, transaction_id: Uuid) -> ApiFailure {
  failure(error.status_code(), ApiError::new(error.key(), &error.user_message()), transaction_id)
}

pub(crate) fn unauthenticated(transaction_id: Uuid) -> ApiFailure {
  failure(
    StatusCode::UNAUTHORIZED,
    ApiError::new("authentication_required", "Log in with the access password first."),
    transaction_id,
  )
}
