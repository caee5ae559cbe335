//! HTTP service for the FYP portal.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`fyp_core::store::RecordStore`] and [`fyp_core::store::AccountStore`].
//! Three surfaces are mounted:
//!
//! - page routes (`/`, `/login`, `/student`, `/faculty`, `/admin`) guarded by
//!   the role-aware gate in [`gate`],
//! - `/auth/*` for the identity gateway,
//! - `/api/*` for the JSON resources.

pub mod auth;
pub mod error;
pub mod gate;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use fyp_core::store::{AccountStore, RecordStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthService;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthService<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    AppState {
      store: Arc::clone(&self.store),
      auth:  Arc::clone(&self.auth),
    }
  }
}

impl<S: AccountStore> AppState<S> {
  /// Build state over a shared store, wiring the identity gateway to it.
  pub fn new(store: Arc<S>) -> Self {
    AppState {
      auth:  Arc::new(AuthService::new(Arc::clone(&store))),
      store,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the portal.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + AccountStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Pages
    .route("/",        get(gate::home_page))
    .route("/login",   get(gate::login_page))
    .route("/student", get(gate::student_page::<S>))
    .route("/faculty", get(gate::faculty_page::<S>))
    .route("/admin",   get(gate::admin_page::<S>))
    // Identity
    .route("/auth/signup",         post(handlers::accounts::sign_up::<S>))
    .route("/auth/signin",         post(handlers::accounts::sign_in::<S>))
    .route("/auth/signout",        post(handlers::accounts::sign_out::<S>))
    .route("/auth/delete-account", post(handlers::accounts::delete_account::<S>))
    // Faculty roster
    .route(
      "/api/faculty",
      get(handlers::faculty::list::<S>).post(handlers::faculty::create::<S>),
    )
    .route(
      "/api/faculty/{id}",
      get(handlers::faculty::get_one::<S>)
        .put(handlers::faculty::update::<S>)
        .delete(handlers::faculty::delete::<S>),
    )
    // Proposals
    .route(
      "/api/proposals",
      get(handlers::proposals::list::<S>)
        .post(handlers::proposals::submit::<S>),
    )
    .route(
      "/api/proposals/{id}",
      get(handlers::proposals::get_one::<S>)
        .delete(handlers::proposals::delete::<S>),
    )
    .route(
      "/api/proposals/{id}/status",
      post(handlers::proposals::set_status::<S>),
    )
    .route(
      "/api/proposals/{id}/comments",
      post(handlers::proposals::add_comment::<S>),
    )
    // Evaluation slots
    .route(
      "/api/slots",
      get(handlers::slots::list::<S>).post(handlers::slots::create::<S>),
    )
    .route("/api/slots/{id}", delete(handlers::slots::delete::<S>))
    .fallback(gate::fallback)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
