//! Handlers for `/api/faculty` — the roster.
//!
//! Reads are open to any session (students browse supervisors). Creation and
//! the full-overwrite update are open to faculty and admins; the cascading
//! delete is admin-only.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use fyp_core::{
  account::Role,
  faculty::{CascadeReport, FacultyFilter, FacultyRecord, NewFaculty},
  store::{AccountStore, RecordStore},
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentSession, error::ApiError};

/// `GET /api/faculty?domain=..&office_hours=..&min_slots=..`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _session: CurrentSession,
  Query(filter): Query<FacultyFilter>,
) -> Result<Json<Vec<FacultyRecord>>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let records = state
    .store
    .list_faculty(&filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(records))
}

/// `GET /api/faculty/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _session: CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<FacultyRecord>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let record = state
    .store
    .get_faculty(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("faculty {id} not found")))?;
  Ok(Json(record))
}

/// `POST /api/faculty` — returns 201 + the stored record. A non-numeric or
/// negative slot count never reaches the store; `slots` is u32 at the wire.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Json(body): Json<NewFaculty>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  require_reviewer(&session)?;

  let record = state
    .store
    .create_faculty(body)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(faculty_id = %record.id, name = %record.name, "faculty created");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/faculty/:id` — full-record overwrite; last writer wins.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<NewFaculty>,
) -> Result<Json<FacultyRecord>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  require_reviewer(&session)?;

  let record = state
    .store
    .update_faculty(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}

/// `DELETE /api/faculty/:id` — admin only. Cascades to the record's
/// evaluation slots as one unit of work and reports the count.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  if session.0.role != Role::Admin {
    return Err(ApiError::Forbidden("admin role required".into()));
  }

  let report = state
    .store
    .delete_faculty(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    faculty_id = %id,
    slots_deleted = report.slots_deleted,
    "faculty deleted with cascade"
  );
  Ok(Json(report))
}

fn require_reviewer(session: &CurrentSession) -> Result<(), ApiError> {
  if session.0.role.is_reviewer() {
    Ok(())
  } else {
    Err(ApiError::Forbidden("reviewer role required".into()))
  }
}
