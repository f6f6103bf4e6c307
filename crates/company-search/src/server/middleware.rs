//! Request context and session middleware
//!
//! Every request gets a [`RequestContext`] (request id plus the shared
//! request log) and a [`CurrentSession`] resolved from the session cookie.

use axum::{
  extract::{Request, State},
  http::{header, HeaderMap, HeaderValue, Method, Uri},
  middleware::Next,
  response::Response,
};
use bentley::request_logs::{LogContext, RequestLogs};
use bentley::Level;
use std::time::Instant;
use uuid::Uuid;

use crate::server::state::AppState;
use crate::session::SessionState;

pub const SESSION_COOKIE: &str = "company_search_session";

/// Request context containing logger and request metadata
#[derive(Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub user_agent: Option<String>,
  /// Shared logger instance
  pub logger: RequestLogs,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, headers: &HeaderMap, logger: RequestLogs) -> Self {
    let user_agent =
      headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()).map(str::to_string);
    Self { request_id: Uuid::new_v4(), method, uri, user_agent, logger }
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.log_with_context(Level::Info, message, component, None, None).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.log_with_context(Level::Success, message, component, None, None).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.log_with_context(Level::Warn, message, component, None, None).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.log_with_context(Level::Error, message, component, None, None).await;
  }

  /// Log with full context information
  pub async fn log_with_context(
    &self,
    level: Level,
    message: &str,
    component: &str,
    status_code: Option<u16>,
    duration_ms: Option<f64>,
  ) {
    let context = LogContext {
      request_id: Some(self.request_id.to_string()),
      method: Some(self.method.to_string()),
      path: Some(self.uri.path().to_string()),
      user_agent: self.user_agent.clone(),
      duration_ms,
      status_code,
    };
    self.logger.record(level, message, component, Some(context)).await;
  }
}

/// Session resolved for the current request. `id` is `None` until a login
/// succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentSession {
  pub id: Option<Uuid>,
  pub state: SessionState,
}

impl CurrentSession {
  pub fn is_authenticated(&self) -> bool {
    self.state.authenticated
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(
  State(state): State<AppState>,
  mut request: Request,
  next: Next,
) -> Response {
  let context = RequestContext::new(
    request.method().clone(),
    request.uri().clone(),
    request.headers(),
    state.logs.clone(),
  );

  let start_time = Instant::now();
  context.log_with_context(Level::Verbose, "Request started", "http-request", None, None).await;

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  let status = response.status();
  let level = if status.is_server_error() { Level::Warn } else { Level::Info };
  context
    .log_with_context(level, "Request completed", "http-request", Some(status.as_u16()), Some(duration_ms))
    .await;

  response
}

/// Middleware resolving the caller's session. Unknown or expired ids resolve
/// to an unauthenticated session; nothing is stored until a login succeeds.
pub async fn session_middleware(
  State(state): State<AppState>,
  mut request: Request,
  next: Next,
) -> Response {
  let session = match session_id_from(request.headers()) {
    Some(id) => match state.sessions.touch(&id).await {
      Some(current) => CurrentSession { id: Some(id), state: current },
      None => CurrentSession::default(),
    },
    None => CurrentSession::default(),
  };

  request.extensions_mut().insert(session);
  next.run(request).await
}

/// Session id carried by the request's cookies, if any
pub fn session_id_from(headers: &HeaderMap) -> Option<Uuid> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .flat_map(|value| value.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: &Uuid) -> String {
  format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Hand a newly issued session id back to the caller
pub fn set_session_cookie(response: &mut Response, id: &Uuid) {
  if let Ok(cookie) = HeaderValue::from_str(&session_cookie(id)) {
    response.headers_mut().append(header::SET_COOKIE, cookie);
  }
}
