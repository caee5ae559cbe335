//! Handlers for `/api/proposals` — the proposal lifecycle over HTTP.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `GET`    | `/api/proposals` | any; students see only their own |
//! | `POST`   | `/api/proposals` | student |
//! | `GET`    | `/api/proposals/:id` | owner, or any reviewer |
//! | `POST`   | `/api/proposals/:id/status` | faculty/admin |
//! | `POST`   | `/api/proposals/:id/comments` | faculty/admin |
//! | `DELETE` | `/api/proposals/:id` | owning student |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fyp_core::{
  account::Role,
  proposal::{NewComment, NewProposal, Proposal, ProposalScope, ProposalStatus},
  store::{AccountStore, RecordStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentSession, error::ApiError};

/// The listing scope a session is entitled to.
fn scope_for(session: &CurrentSession) -> ProposalScope {
  if session.0.role.is_reviewer() {
    ProposalScope::All
  } else {
    ProposalScope::SubmittedBy(session.0.user_id)
  }
}

/// `GET /api/proposals` — newest first, visibility by role.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
) -> Result<Json<Vec<Proposal>>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let proposals = state
    .store
    .list_proposals(scope_for(&session))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(proposals))
}

/// JSON body accepted by `POST /api/proposals`. Identity fields come from
/// the session, never from the body.
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub title:       String,
  pub description: String,
  pub supervisor:  String,
}

/// `POST /api/proposals` — students only; returns 201 + the stored proposal.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  if session.0.role != Role::Student {
    return Err(ApiError::Forbidden(
      "only students submit proposals".into(),
    ));
  }

  let proposal = state
    .store
    .submit_proposal(NewProposal {
      title:           body.title,
      description:     body.description,
      supervisor_name: body.supervisor,
      submitted_by:    session.0.user_id,
      student_name:    session.0.display_name.clone(),
      student_email:   session.0.email.clone(),
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(proposal_id = %proposal.id, "proposal submitted");
  Ok((StatusCode::CREATED, Json(proposal)))
}

/// `GET /api/proposals/:id`
///
/// Students can only see their own submissions; a foreign id answers 404
/// rather than confirming the proposal exists.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<Proposal>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let proposal = state
    .store
    .get_proposal(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("proposal {id} not found")))?;

  if !session.0.role.is_reviewer() && proposal.submitted_by != session.0.user_id
  {
    return Err(ApiError::NotFound(format!("proposal {id} not found")));
  }
  Ok(Json(proposal))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ProposalStatus,
}

/// `POST /api/proposals/:id/status` — reviewers only; transition validated
/// by the store, idempotent for the current status.
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Proposal>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  require_reviewer(&session)?;

  let proposal = state
    .store
    .set_proposal_status(id, body.status)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(proposal_id = %id, status = %body.status, "proposal status set");
  Ok(Json(proposal))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub text: String,
}

/// `POST /api/proposals/:id/comments` — reviewers only; the author is the
/// session's display name and the date is assigned by the store.
pub async fn add_comment<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<Json<Proposal>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  require_reviewer(&session)?;

  let proposal = state
    .store
    .add_comment(id, NewComment {
      text:   body.text,
      author: session.0.display_name.clone(),
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(proposal))
}

/// `DELETE /api/proposals/:id` — the store enforces the owner-only rule.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .delete_proposal(id, session.0.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

fn require_reviewer(session: &CurrentSession) -> Result<(), ApiError> {
  if session.0.role.is_reviewer() {
    Ok(())
  } else {
    Err(ApiError::Forbidden("reviewer role required".into()))
  }
}
