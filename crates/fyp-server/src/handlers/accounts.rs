//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Body: [`SignUpBody`]; returns 201 + session |
//! | `POST` | `/auth/signin` | Body: [`SignInBody`] |
//! | `POST` | `/auth/signout` | Bearer token |
//! | `POST` | `/auth/delete-account` | Bearer token + reauth password |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use fyp_core::{
  account::{Role, UserAccount},
  store::{AccountStore, RecordStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{SignUp, bearer_token},
  error::ApiError,
};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// The account fields safe to serialise out of the server.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
  pub user_id:      Uuid,
  pub email:        String,
  pub display_name: String,
  pub role:         Role,
}

impl From<UserAccount> for AccountInfo {
  fn from(a: UserAccount) -> Self {
    AccountInfo {
      user_id:      a.user_id,
      email:        a.email,
      display_name: a.display_name,
      role:         a.role,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SessionBody {
  pub token: String,
  pub user:  AccountInfo,
}

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub email:        String,
  pub password:     String,
  pub display_name: String,
  /// Accepted as submitted. Restricting `faculty`/`admin` registration to a
  /// provisioning step is left to the deployment.
  pub role:         Role,
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountBody {
  pub password: String,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `POST /auth/signup` — register and sign in immediately.
pub async fn sign_up<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignUpBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let session = state
    .auth
    .sign_up(SignUp {
      email:        body.email,
      password:     body.password,
      display_name: body.display_name,
      role:         body.role,
    })
    .await?;

  tracing::info!(user_id = %session.account.user_id, "account created");
  Ok((
    StatusCode::CREATED,
    Json(SessionBody {
      token: session.token,
      user:  session.account.into(),
    }),
  ))
}

/// `POST /auth/signin`
pub async fn sign_in<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignInBody>,
) -> Result<Json<SessionBody>, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let session = state.auth.sign_in(&body.email, &body.password).await?;
  Ok(Json(SessionBody {
    token: session.token,
    user:  session.account.into(),
  }))
}

/// `POST /auth/signout`
pub async fn sign_out<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let token = bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
  state.auth.sign_out(token).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /auth/delete-account` — requires the password to be re-submitted.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<DeleteAccountBody>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  let token = bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
  state.auth.delete_account(token, &body.password).await?;
  Ok(StatusCode::NO_CONTENT)
}
