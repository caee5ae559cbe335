//! The access-control gate over the page routes.
//!
//! `/` and `/login` are public. The three dashboard routes require a live
//! session with the matching role: a missing or invalid session redirects to
//! `/login` with an empty body, so no protected content is ever sent — not
//! even transiently — while a wrong role answers 403. Unmatched paths
//! redirect to `/`.

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
  response::{IntoResponse, Redirect, Response},
};
use fyp_core::{
  account::Role,
  store::{AccountStore, RecordStore},
};
use serde_json::json;

use crate::{AppState, auth::session_from_headers, error::ApiError};

pub async fn home_page() -> Response {
  Json(json!({ "page": "home" })).into_response()
}

pub async fn login_page() -> Response {
  Json(json!({ "page": "login" })).into_response()
}

pub async fn fallback() -> Redirect {
  Redirect::to("/")
}

/// Render a role-gated dashboard descriptor, or deny.
async fn gated_page<S>(
  state: &AppState<S>,
  headers: &HeaderMap,
  page: &str,
  allowed: &[Role],
) -> Response
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let account = match session_from_headers(headers, &state.auth).await {
    Ok(account) => account,
    // The session check failed; nothing of the page leaves the server.
    Err(_) => return Redirect::to("/login").into_response(),
  };

  if !allowed.contains(&account.role) {
    return ApiError::Forbidden(format!(
      "the {} dashboard requires a different role",
      page
    ))
    .into_response();
  }

  Json(json!({
    "page": page,
    "user": {
      "user_id": account.user_id,
      "display_name": account.display_name,
      "role": account.role,
    },
  }))
  .into_response()
}

pub async fn student_page<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Response
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  gated_page(&state, &headers, "student", &[Role::Student]).await
}

pub async fn faculty_page<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Response
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  gated_page(&state, &headers, "faculty", &[Role::Faculty, Role::Admin]).await
}

pub async fn admin_page<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Response
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  gated_page(&state, &headers, "admin", &[Role::Admin]).await
}
