//! JSON API handlers

use axum::{
  extract::{Extension, Json, State},
  response::{IntoResponse, Json as ResponseJson, Response},
};

use crate::error::SearchError;
use crate::search::{Query, DEFAULT_CANDIDATE_POOL, DEFAULT_MAX_RESULTS};
use crate::server::handlers::{search_failure, unauthenticated, ApiFailure};
use crate::server::middleware::{set_session_cookie, CurrentSession, RequestContext};
use crate::server::state::AppState;
use crate::server::types::{
  BaseResponse, CompanyResult, LoginRequest, SearchRequest, SearchResponse, SessionResponse,
};

/// POST /api/login - Authenticate the calling session
pub async fn api_login(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
  Json(request): Json<LoginRequest>,
) -> Result<Response, ApiFailure> {
  let transaction_id = context.request_id;

  let mut next = session.state;
  if !state.gate.authenticate(&mut next, &request.password) {
    context.log_warn("Rejected login attempt", "session-api").await;
    return Err(search_failure(&SearchError::AuthenticationRejected, transaction_id));
  }

  let issued = state.sessions.save(session.id, next).await;
  context.log_success("Session authenticated", "session-api").await;

  let body = BaseResponse::success(SessionResponse { authenticated: true }, transaction_id);
  let mut response = ResponseJson(body).into_response();
  if let Some(id) = issued {
    set_session_cookie(&mut response, &id);
  }
  Ok(response)
}

/// POST /api/logout - Reset the calling session
pub async fn api_logout(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
) -> ResponseJson<BaseResponse<SessionResponse>> {
  if session.id.is_some() {
    let mut next = session.state;
    state.gate.logout(&mut next);
    state.sessions.save(session.id, next).await;
  }
  context.log_info("Session logged out", "session-api").await;

  ResponseJson(BaseResponse::success(SessionResponse { authenticated: false }, context.request_id))
}

/// POST /api/search - Find companies similar to a description
pub async fn api_search(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
  Json(request): Json<SearchRequest>,
) -> Result<ResponseJson<BaseResponse<SearchResponse>>, ApiFailure> {
  let transaction_id = context.request_id;

  if !session.is_authenticated() {
    context.log_warn("Search attempted without authentication", "search-api").await;
    return Err(unauthenticated(transaction_id));
  }

  let query = Query::new(request.description).with_industries(request.industries).with_limits(
    request.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
    request.candidate_pool_size.unwrap_or(DEFAULT_CANDIDATE_POOL),
  );

  match state.orchestrator.search_companies(&query).await {
    Ok(records) => {
      context.log_success(&format!("Search returned {} companies", records.len()), "search-api").await;
      let results: Vec<CompanyResult> = records.into_iter().map(CompanyResult::from).collect();
      let count = results.len();
      Ok(ResponseJson(BaseResponse::success(SearchResponse { results, count }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Search failed ({}): {e}", e.key()), "search-api").await;
      Err(search_failure(&e, transaction_id))
    }
  }
}
