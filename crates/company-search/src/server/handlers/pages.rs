//! Browser-facing page handlers

use axum::{
  extract::{Extension, Form, State},
  response::{Html, IntoResponse, Redirect, Response},
};

use crate::error::SearchError;
use crate::server::forms::{LoginForm, SearchForm};
use crate::server::middleware::{set_session_cookie, CurrentSession, RequestContext};
use crate::server::state::AppState;
use crate::server::views::{self, Outcome};

/// GET / - Login form, or the search form once authenticated
pub async fn index(Extension(session): Extension<CurrentSession>) -> Html<String> {
  if session.is_authenticated() {
    Html(views::search_page(&SearchForm::default(), None))
  } else {
    Html(views::login_page(None))
  }
}

/// POST /login - Check the shared password
pub async fn login(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
  Form(form): Form<LoginForm>,
) -> Response {
  let mut next = session.state;
  if !state.gate.authenticate(&mut next, &form.password) {
    context.log_warn("Rejected login attempt", "session").await;
    let error = SearchError::AuthenticationRejected;
    return (error.status_code(), Html(views::login_page(Some(error.user_message().as_str()))))
      .into_response();
  }

  let issued = state.sessions.save(session.id, next).await;
  context.log_success("Session authenticated", "session").await;

  let mut response = Redirect::to("/").into_response();
  if let Some(id) = issued {
    set_session_cookie(&mut response, &id);
  }
  response
}

/// POST /logout - Drop back to the login form
pub async fn logout(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
) -> Redirect {
  if session.id.is_some() {
    let mut next = session.state;
    state.gate.logout(&mut next);
    state.sessions.save(session.id, next).await;
  }
  context.log_info("Session logged out", "session").await;
  Redirect::to("/")
}

/// POST /search - Run a search and render the results under the form
pub async fn search(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Extension(session): Extension<CurrentSession>,
  Form(form): Form<SearchForm>,
) -> Response {
  if !session.is_authenticated() {
    return Redirect::to("/").into_response();
  }

  let outcome = match form.to_query() {
    Ok(query) => state.orchestrator.search_companies(&query).await,
    Err(e) => Err(SearchError::from(e)),
  };

  match outcome {
    Ok(records) => {
      context.log_success(&format!("Search returned {} companies", records.len()), "search").await;
      Html(views::search_page(&form, Some(Outcome::Results(&records)))).into_response()
    }
    Err(e) => {
      context.log_error(&format!("Search failed ({}): {e}", e.key()), "search").await;
      let message = e.user_message();
      (e.status_code(), Html(views::search_page(&form, Some(Outcome::Error(&message))))).into_response()
    }
  }
}
