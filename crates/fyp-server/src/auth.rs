//! The identity gateway: sign-up, sign-in, sign-out, account deletion with
//! reauthentication, and the bearer-session extractor.
//!
//! Passwords are hashed with argon2id. Session tokens are 32 random bytes,
//! base64url on the wire; only the SHA-256 hex digest is persisted, so the
//! database never holds a live token.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use fyp_core::{
  account::{NewAccount, Role, SessionEvent, UserAccount},
  store::{AccountStore, RecordStore},
};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};
use tokio::sync::broadcast;

use crate::{AppState, error::ApiError};

// ─── Credentials ─────────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(e.to_string().into()))
}

pub fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(phc).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  B64.encode(bytes)
}

fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// An established session: the bearer token handed to the client once, and
/// the account it authenticates.
#[derive(Debug)]
pub struct Session {
  pub token:   String,
  pub account: UserAccount,
}

/// Input to [`AuthService::sign_up`].
#[derive(Debug)]
pub struct SignUp {
  pub email:        String,
  pub password:     String,
  pub display_name: String,
  pub role:         Role,
}

/// Wraps the account store with credential handling and session-change
/// broadcasting.
pub struct AuthService<S> {
  store:  Arc<S>,
  events: broadcast::Sender<SessionEvent>,
}

impl<S: AccountStore> AuthService<S> {
  pub fn new(store: Arc<S>) -> Self {
    let (events, _) = broadcast::channel(16);
    Self { store, events }
  }

  /// Observe session establishment and loss. Teardown is dropping the
  /// receiver; a lagging receiver misses events rather than blocking the
  /// gateway.
  pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
    self.events.subscribe()
  }

  fn notify(&self, event: SessionEvent) {
    // send only fails when nobody is subscribed, which is fine.
    let _ = self.events.send(event);
  }

  /// Register an account and sign it in immediately.
  pub async fn sign_up(&self, input: SignUp) -> Result<Session, ApiError> {
    if !input.email.contains('@') {
      return Err(ApiError::Validation("invalid email address".into()));
    }
    if input.password.chars().count() < 8 {
      return Err(ApiError::Validation(
        "password must be at least 8 characters".into(),
      ));
    }
    if input.display_name.trim().is_empty() {
      return Err(ApiError::Validation("display name is required".into()));
    }

    let account = self
      .store
      .create_account(NewAccount {
        email:         input.email,
        display_name:  input.display_name,
        role:          input.role,
        password_hash: hash_password(&input.password)?,
      })
      .await
      .map_err(ApiError::from_store)?;

    self.issue_session(account).await
  }

  /// Authenticate credentials. Failures are indistinguishable: an unknown
  /// email and a wrong password produce the same error.
  pub async fn sign_in(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Session, ApiError> {
    let account = self
      .store
      .find_account_by_email(email)
      .await
      .map_err(ApiError::from_store)?
      .ok_or(ApiError::Unauthorized)?;

    verify_password(password, &account.password_hash)?;
    self.issue_session(account).await
  }

  async fn issue_session(
    &self,
    account: UserAccount,
  ) -> Result<Session, ApiError> {
    let token = generate_token();
    self
      .store
      .create_session(account.user_id, &token_digest(&token))
      .await
      .map_err(ApiError::from_store)?;

    self.notify(SessionEvent::SignedIn { user_id: account.user_id });
    Ok(Session { token, account })
  }

  /// Revoke the session behind `token`. Unknown tokens are a no-op.
  pub async fn sign_out(&self, token: &str) -> Result<(), ApiError> {
    let digest = token_digest(token);
    let account = self
      .store
      .find_session(&digest)
      .await
      .map_err(ApiError::from_store)?;

    self
      .store
      .delete_session(&digest)
      .await
      .map_err(ApiError::from_store)?;

    if let Some(account) = account {
      self.notify(SessionEvent::SignedOut { user_id: account.user_id });
    }
    Ok(())
  }

  /// Delete the signed-in account. Requires the password to be re-submitted;
  /// a failed reauthentication leaves the account untouched.
  pub async fn delete_account(
    &self,
    token: &str,
    reauth_password: &str,
  ) -> Result<(), ApiError> {
    let account = self.authenticate(token).await?;
    verify_password(reauth_password, &account.password_hash)?;

    self
      .store
      .delete_account(account.user_id)
      .await
      .map_err(ApiError::from_store)?;

    self.notify(SessionEvent::SignedOut { user_id: account.user_id });
    Ok(())
  }

  /// Resolve a bearer token to its account, or fail as unauthorized.
  pub async fn authenticate(&self, token: &str) -> Result<UserAccount, ApiError> {
    self
      .store
      .find_session(&token_digest(token))
      .await
      .map_err(ApiError::from_store)?
      .ok_or(ApiError::Unauthorized)
  }
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
}

/// Resolve the request's session directly from headers — used by the page
/// gate, which redirects rather than answering 401.
pub async fn session_from_headers<S: AccountStore>(
  headers: &HeaderMap,
  auth: &AuthService<S>,
) -> Result<UserAccount, ApiError> {
  let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
  auth.authenticate(token).await
}

/// The authenticated account behind the current request. Present in a
/// handler's signature means the request carried a valid session.
pub struct CurrentSession(pub UserAccount);

impl<S> FromRequestParts<AppState<S>> for CurrentSession
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let account = session_from_headers(&parts.headers, &state.auth).await?;
    Ok(CurrentSession(account))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokens_are_unique_and_urlsafe() {
    let a = generate_token();
    let b = generate_token();
    assert_ne!(a, b);
    assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
  }

  #[test]
  fn digest_is_stable_hex() {
    let d1 = token_digest("abc");
    let d2 = token_digest("abc");
    assert_eq!(d1, d2);
    assert_eq!(d1.len(), 64);
    assert_ne!(d1, token_digest("abd"));
  }

  #[test]
  fn password_hash_verifies_and_rejects() {
    let phc = hash_password("correct horse").unwrap();
    assert!(verify_password("correct horse", &phc).is_ok());
    assert!(matches!(
      verify_password("wrong", &phc),
      Err(ApiError::Unauthorized)
    ));
  }
}
