//! User accounts and sessions.
//!
//! The original design implied a user's role from whichever dashboard route
//! they navigated to. Here the role is a stored attribute, verified on every
//! request, and the access gate consults it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role an account holds. Determines which routes and operations the
/// access gate permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Faculty,
  Admin,
}

impl Role {
  /// Whether this role may review proposals (status changes, comments).
  pub fn is_reviewer(self) -> bool {
    matches!(self, Role::Faculty | Role::Admin)
  }
}

impl std::fmt::Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Role::Student => "student",
      Role::Faculty => "faculty",
      Role::Admin => "admin",
    };
    f.write_str(s)
  }
}

/// A registered account. The password hash is an argon2 PHC string and is
/// never serialised out of the server.
#[derive(Debug, Clone)]
pub struct UserAccount {
  pub user_id:       Uuid,
  pub email:         String,
  pub display_name:  String,
  pub role:          Role,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::AccountStore::create_account`].
/// `user_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub email:         String,
  pub display_name:  String,
  pub role:          Role,
  pub password_hash: String,
}

/// A session change, broadcast to subscribers of the identity gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
  SignedIn { user_id: Uuid },
  SignedOut { user_id: Uuid },
}
