//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("validation failed: {0}")]
  Validation(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// A named reference (supervisor, faculty) did not resolve.
  #[error("unresolved reference: {0}")]
  Referential(String),

  /// Illegal status transition or duplicate email.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error onto the HTTP taxonomy by walking its source chain
  /// for a domain error; anything else is an internal failure.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut cur: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(e) = cur {
      if let Some(core) = e.downcast_ref::<fyp_core::Error>() {
        return Self::from_core(core);
      }
      cur = e.source();
    }
    ApiError::Store(Box::new(err))
  }

  fn from_core(err: &fyp_core::Error) -> Self {
    use fyp_core::Error as E;
    match err {
      E::FacultyNotFound(_)
      | E::ProposalNotFound(_)
      | E::SlotNotFound(_)
      | E::AccountNotFound(_) => ApiError::NotFound(err.to_string()),
      E::EmptyField(_) => ApiError::Validation(err.to_string()),
      E::UnknownFaculty(_) => ApiError::Referential(err.to_string()),
      E::IllegalTransition { .. } | E::EmailTaken(_) => {
        ApiError::Conflict(err.to_string())
      }
      E::NotProposalOwner(_) => ApiError::Forbidden(err.to_string()),
      E::PartialCascade { .. } | E::Serialization(_) => {
        ApiError::Store(err.to_string().into())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Referential(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        // Internal detail is logged, never surfaced to the client.
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
