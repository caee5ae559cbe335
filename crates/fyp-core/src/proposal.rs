//! Proposals and the review-status state machine.
//!
//! A proposal is created `pending` and moves through review by faculty or
//! admin actors. `accepted` and `rejected` are terminal. Comments are
//! append-only; `submitted_by` never changes after creation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Review status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
  Pending,
  Accepted,
  Rejected,
  Revision,
}

impl ProposalStatus {
  /// Whether a reviewer may move a proposal from `self` to `to`.
  ///
  /// Re-setting the current status is always permitted and is a no-op at the
  /// store, so repeated identical requests have no duplicate side effects.
  /// Otherwise only `pending` and `revision` have outgoing edges.
  pub fn can_transition_to(self, to: ProposalStatus) -> bool {
    if self == to {
      return true;
    }
    match self {
      ProposalStatus::Pending | ProposalStatus::Revision => matches!(
        to,
        ProposalStatus::Accepted
          | ProposalStatus::Rejected
          | ProposalStatus::Revision
      ),
      ProposalStatus::Accepted | ProposalStatus::Rejected => false,
    }
  }

  /// Validate a transition, producing the typed error used across the store
  /// boundary.
  pub fn check_transition(self, to: ProposalStatus) -> Result<()> {
    if self.can_transition_to(to) {
      Ok(())
    } else {
      Err(Error::IllegalTransition { from: self, to })
    }
  }
}

impl std::fmt::Display for ProposalStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      ProposalStatus::Pending => "pending",
      ProposalStatus::Accepted => "accepted",
      ProposalStatus::Rejected => "rejected",
      ProposalStatus::Revision => "revision",
    };
    f.write_str(s)
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// A reviewer comment. Comments are only ever appended, never edited or
/// removed; order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub text:   String,
  pub author: String,
  pub date:   NaiveDate,
}

/// Input to [`crate::store::RecordStore::add_comment`]. The date is assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewComment {
  pub text:   String,
  pub author: String,
}

impl NewComment {
  pub fn validate(&self) -> Result<()> {
    if self.text.trim().is_empty() {
      return Err(Error::EmptyField("comment"));
    }
    Ok(())
  }
}

// ─── Proposal ────────────────────────────────────────────────────────────────

/// A student-submitted project proposal under review.
///
/// `supervisor_id` is the authoritative reference to the faculty record;
/// `supervisor_name` is a denormalized display copy kept for history, so a
/// later faculty rename does not rewrite what the student submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
  pub id:              Uuid,
  pub title:           String,
  pub description:     String,
  pub supervisor_id:   Uuid,
  pub supervisor_name: String,
  pub status:          ProposalStatus,
  /// Immutable after creation.
  pub submitted_by:    Uuid,
  /// Server-assigned at creation.
  pub submitted_at:    DateTime<Utc>,
  pub student_name:    String,
  pub student_email:   String,
  pub comments:        Vec<Comment>,
}

/// Input to [`crate::store::RecordStore::submit_proposal`]. The supervisor is
/// given by name and resolved by the store; identity fields come from the
/// submitting session, never from a request body.
#[derive(Debug, Clone)]
pub struct NewProposal {
  pub title:           String,
  pub description:     String,
  pub supervisor_name: String,
  pub submitted_by:    Uuid,
  pub student_name:    String,
  pub student_email:   String,
}

impl NewProposal {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyField("title"));
    }
    if self.description.trim().is_empty() {
      return Err(Error::EmptyField("description"));
    }
    if self.supervisor_name.trim().is_empty() {
      return Err(Error::EmptyField("supervisor"));
    }
    Ok(())
  }
}

/// Visibility scope for proposal listings: students see their own
/// submissions, reviewers see everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalScope {
  SubmittedBy(Uuid),
  All,
}

#[cfg(test)]
mod tests {
  use super::ProposalStatus::*;
  use super::*;

  #[test]
  fn pending_and_revision_may_move_to_any_review_outcome() {
    for from in [Pending, Revision] {
      for to in [Accepted, Rejected, Revision] {
        assert!(from.can_transition_to(to), "{from} -> {to}");
      }
    }
  }

  #[test]
  fn accepted_and_rejected_are_terminal() {
    for from in [Accepted, Rejected] {
      for to in [Pending, Revision] {
        assert!(!from.can_transition_to(to), "{from} -> {to}");
      }
    }
    assert!(!Accepted.can_transition_to(Rejected));
    assert!(!Rejected.can_transition_to(Accepted));
  }

  #[test]
  fn resetting_current_status_is_allowed() {
    for s in [Pending, Accepted, Rejected, Revision] {
      assert!(s.can_transition_to(s));
    }
  }

  #[test]
  fn check_transition_produces_typed_error() {
    let err = Accepted.check_transition(Revision).unwrap_err();
    assert!(matches!(
      err,
      Error::IllegalTransition { from: Accepted, to: Revision }
    ));
  }

  #[test]
  fn reopening_pending_from_revision_is_not_defined() {
    assert!(!Revision.can_transition_to(Pending));
  }

  #[test]
  fn blank_comment_fails_validation() {
    let c = NewComment { text: "   ".into(), author: "Dr. A".into() };
    assert!(matches!(c.validate(), Err(Error::EmptyField("comment"))));
  }
}
