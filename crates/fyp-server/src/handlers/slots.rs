//! Handlers for `/api/slots` — evaluation scheduling.
//!
//! Slot creation resolves the faculty by name; an unknown name answers 422
//! rather than silently doing nothing.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fyp_core::{
  account::Role,
  slot::{EvaluationSlot, NewSlot},
  store::{AccountStore, RecordStore},
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentSession, error::ApiError};

/// `GET /api/slots`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _session: CurrentSession,
) -> Result<Json<Vec<EvaluationSlot>>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let slots = state
    .store
    .list_slots()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(slots))
}

/// `POST /api/slots` — admin only; returns 201 + the stored slot.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Json(body): Json<NewSlot>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  require_admin(&session)?;

  let slot = state
    .store
    .create_slot(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(slot)))
}

/// `DELETE /api/slots/:id` — admin only, unconditional.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  require_admin(&session)?;

  state
    .store
    .delete_slot(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

fn require_admin(session: &CurrentSession) -> Result<(), ApiError> {
  if session.0.role == Role::Admin {
    Ok(())
  } else {
    Err(ApiError::Forbidden("admin role required".into()))
  }
}
