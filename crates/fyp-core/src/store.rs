//! The `RecordStore` and `AccountStore` traits.
//!
//! Implemented by storage backends (e.g. `fyp-store-sqlite`). The HTTP layer
//! depends on these abstractions, not on any concrete backend. The typed
//! operations are where the core invariants live: the status transition
//! table, the owner-only delete rule, referential resolution of faculty
//! names, and the atomic cascade.

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{NewAccount, UserAccount},
  faculty::{CascadeReport, FacultyFilter, FacultyRecord, NewFaculty},
  proposal::{NewComment, NewProposal, Proposal, ProposalScope, ProposalStatus},
  slot::{EvaluationSlot, NewSlot},
};

// ─── Record store ────────────────────────────────────────────────────────────

/// Abstraction over the portal's three record collections: faculty,
/// proposals, and evaluation slots.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Writes are
/// confirmed before any caller-visible state changes — implementations never
/// reflect an update they have not persisted.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Faculty roster ────────────────────────────────────────────────────

  /// List faculty records matching `filter` (all criteria AND-combined).
  fn list_faculty<'a>(
    &'a self,
    filter: &'a FacultyFilter,
  ) -> impl Future<Output = Result<Vec<FacultyRecord>, Self::Error>> + Send + 'a;

  /// Retrieve a faculty record by id. Returns `None` if not found.
  fn get_faculty(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<FacultyRecord>, Self::Error>> + Send + '_;

  /// Resolve a faculty record by exact name match. Backs the referential
  /// checks on proposal submission and slot creation.
  fn find_faculty_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<FacultyRecord>, Self::Error>> + Send + 'a;

  /// Create a faculty record. Fields are validated before any write.
  fn create_faculty(
    &self,
    input: NewFaculty,
  ) -> impl Future<Output = Result<FacultyRecord, Self::Error>> + Send + '_;

  /// Full-record overwrite of an existing faculty record. Last writer wins;
  /// no version check is performed.
  fn update_faculty(
    &self,
    id: Uuid,
    input: NewFaculty,
  ) -> impl Future<Output = Result<FacultyRecord, Self::Error>> + Send + '_;

  /// Delete a faculty record and every evaluation slot referencing it, as a
  /// single unit of work. Returns how many slots went with the record.
  ///
  /// Implementations without a transaction primitive must report partial
  /// failure (record gone, slots orphaned) as an error, never silently.
  fn delete_faculty(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<CascadeReport, Self::Error>> + Send + '_;

  // ── Proposal lifecycle ────────────────────────────────────────────────

  /// Create a proposal with status `pending` and a store-assigned
  /// submission timestamp. The supervisor name must resolve to an existing
  /// faculty record.
  fn submit_proposal(
    &self,
    input: NewProposal,
  ) -> impl Future<Output = Result<Proposal, Self::Error>> + Send + '_;

  /// Retrieve a proposal by id. Returns `None` if not found.
  fn get_proposal(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Proposal>, Self::Error>> + Send + '_;

  /// List proposals visible under `scope`, newest first.
  fn list_proposals(
    &self,
    scope: ProposalScope,
  ) -> impl Future<Output = Result<Vec<Proposal>, Self::Error>> + Send + '_;

  /// Move a proposal to `status`, validated against the transition table.
  /// Re-setting the current status is an idempotent no-op.
  fn set_proposal_status(
    &self,
    id: Uuid,
    status: ProposalStatus,
  ) -> impl Future<Output = Result<Proposal, Self::Error>> + Send + '_;

  /// Append a reviewer comment. Prior comments are never edited, removed,
  /// or reordered.
  fn add_comment(
    &self,
    id: Uuid,
    comment: NewComment,
  ) -> impl Future<Output = Result<Proposal, Self::Error>> + Send + '_;

  /// Delete a proposal (and its comments). Permitted only when
  /// `requested_by` matches the proposal's `submitted_by`.
  fn delete_proposal(
    &self,
    id: Uuid,
    requested_by: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Evaluation slots ──────────────────────────────────────────────────

  fn list_slots(
    &self,
  ) -> impl Future<Output = Result<Vec<EvaluationSlot>, Self::Error>> + Send + '_;

  /// Create a slot with status `available`. The faculty name must resolve
  /// to an existing record; an unknown name is an error, not a no-op.
  fn create_slot(
    &self,
    input: NewSlot,
  ) -> impl Future<Output = Result<EvaluationSlot, Self::Error>> + Send + '_;

  /// Unconditional delete of a slot.
  fn delete_slot(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Account store ───────────────────────────────────────────────────────────

/// Persistence for accounts and their bearer sessions. Session tokens are
/// handed to callers once and only their digests are stored, so the store
/// never sees a live token.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an account. Fails if the email is already registered.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<UserAccount, Self::Error>> + Send + '_;

  fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserAccount>, Self::Error>> + Send + 'a;

  fn get_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserAccount>, Self::Error>> + Send + '_;

  /// Delete an account and all of its sessions.
  fn delete_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Record a session under the hex digest of its bearer token.
  fn create_session<'a>(
    &'a self,
    user_id: Uuid,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Resolve a session digest to its account. Returns `None` for unknown or
  /// revoked sessions.
  fn find_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<Option<UserAccount>, Self::Error>> + Send + 'a;

  /// Revoke a session. Revoking an unknown digest is not an error.
  fn delete_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
