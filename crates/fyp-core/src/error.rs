//! Error types for `fyp-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::proposal::ProposalStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("faculty record not found: {0}")]
  FacultyNotFound(Uuid),

  #[error("proposal not found: {0}")]
  ProposalNotFound(Uuid),

  #[error("evaluation slot not found: {0}")]
  SlotNotFound(Uuid),

  #[error("account not found: {0}")]
  AccountNotFound(Uuid),

  #[error("required field is empty: {0}")]
  EmptyField(&'static str),

  /// A supervisor or faculty name did not resolve to an existing record.
  /// Creation referencing a nonexistent faculty fails loudly, never as a
  /// silent no-op.
  #[error("no faculty record named {0:?}")]
  UnknownFaculty(String),

  #[error("illegal status transition: {from} -> {to}")]
  IllegalTransition {
    from: ProposalStatus,
    to:   ProposalStatus,
  },

  /// Only the submitting student may delete a proposal.
  #[error("proposal {0} is not owned by the requesting account")]
  NotProposalOwner(Uuid),

  #[error("an account already exists for email {0:?}")]
  EmailTaken(String),

  /// A cascading faculty delete left orphaned evaluation slots behind.
  /// Backends with a transaction primitive never produce this; backends
  /// without one must report it rather than swallow it.
  #[error("faculty {faculty_id} deleted but {orphaned} slot(s) remain")]
  PartialCascade { faculty_id: Uuid, orphaned: usize },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
