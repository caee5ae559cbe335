//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveTime};
use fyp_core::{
  account::{NewAccount, Role},
  faculty::{Domain, FacultyFilter, NewFaculty},
  proposal::{NewComment, NewProposal, ProposalScope, ProposalStatus},
  slot::{NewSlot, SlotStatus},
  store::{AccountStore, RecordStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dr_a() -> NewFaculty {
  NewFaculty {
    name:         "Dr. A".into(),
    email:        "a@x.com".into(),
    domain:       Domain::Ai,
    slots:        3,
    office_hours: "Mon 10-12".into(),
  }
}

fn proposal_for(supervisor: &str, submitted_by: Uuid) -> NewProposal {
  NewProposal {
    title:           "Adaptive exam scheduling".into(),
    description:     "Constraint solver for exam timetables".into(),
    supervisor_name: supervisor.into(),
    submitted_by,
    student_name:    "Sana Iqbal".into(),
    student_email:   "sana@uni.example".into(),
  }
}

fn slot_for(faculty: &str) -> NewSlot {
  NewSlot {
    faculty_name: faculty.into(),
    date:         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    time:         NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
  }
}

// ─── Faculty roster ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_faculty() {
  let s = store().await;

  let created = s.create_faculty(dr_a()).await.unwrap();
  let fetched = s.get_faculty(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Dr. A");
  assert_eq!(fetched.domain, Domain::Ai);
  assert_eq!(fetched.slots, 3);
}

#[tokio::test]
async fn create_faculty_rejects_empty_name() {
  let s = store().await;

  let mut input = dr_a();
  input.name = "".into();
  let err = s.create_faculty(input).await.unwrap_err();
  assert!(err.to_string().contains("name"), "{err}");

  // Nothing was written.
  let all = s.list_faculty(&FacultyFilter::default()).await.unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn filter_round_trip_on_domain_and_slots() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();

  // Case-insensitive domain substring matches.
  let by_domain = FacultyFilter { domain: Some("ai".into()), ..Default::default() };
  let hits = s.list_faculty(&by_domain).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Dr. A");

  // min_slots above the record's count excludes it.
  let by_slots = FacultyFilter { min_slots: Some(4), ..Default::default() };
  assert!(s.list_faculty(&by_slots).await.unwrap().is_empty());
}

#[tokio::test]
async fn filter_on_office_hours_substring() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();

  let f = FacultyFilter {
    office_hours: Some("mon".into()),
    ..Default::default()
  };
  assert_eq!(s.list_faculty(&f).await.unwrap().len(), 1);

  let f = FacultyFilter {
    office_hours: Some("friday".into()),
    ..Default::default()
  };
  assert!(s.list_faculty(&f).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_faculty_is_full_overwrite() {
  let s = store().await;
  let created = s.create_faculty(dr_a()).await.unwrap();

  let updated = s
    .update_faculty(created.id, NewFaculty {
      name:         "Dr. A".into(),
      email:        "a@y.com".into(),
      domain:       Domain::Networks,
      slots:        0,
      office_hours: "Tue 14-16".into(),
    })
    .await
    .unwrap();
  assert_eq!(updated.slots, 0);

  let fetched = s.get_faculty(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.email, "a@y.com");
  assert_eq!(fetched.domain, Domain::Networks);
  assert_eq!(fetched.office_hours, "Tue 14-16");
}

#[tokio::test]
async fn update_missing_faculty_fails() {
  let s = store().await;
  let err = s.update_faculty(Uuid::new_v4(), dr_a()).await.unwrap_err();
  assert!(err.to_string().contains("not found"), "{err}");
}

// ─── Cascade delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_faculty_cascades_to_its_slots() {
  let s = store().await;
  let a = s.create_faculty(dr_a()).await.unwrap();
  let mut other = dr_a();
  other.name = "Dr. B".into();
  let b = s.create_faculty(other).await.unwrap();

  s.create_slot(slot_for("Dr. A")).await.unwrap();
  s.create_slot(slot_for("Dr. A")).await.unwrap();
  s.create_slot(slot_for("Dr. B")).await.unwrap();

  let report = s.delete_faculty(a.id).await.unwrap();
  assert_eq!(report.slots_deleted, 2);

  // Dr. B's slot survives; no dangling references remain.
  let remaining = s.list_slots().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].faculty_id, b.id);
  assert!(s.get_faculty(a.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_faculty_with_no_slots_reports_zero() {
  let s = store().await;
  let a = s.create_faculty(dr_a()).await.unwrap();
  let report = s.delete_faculty(a.id).await.unwrap();
  assert_eq!(report.slots_deleted, 0);
}

#[tokio::test]
async fn delete_missing_faculty_is_an_error_not_silence() {
  let s = store().await;
  assert!(s.delete_faculty(Uuid::new_v4()).await.is_err());
}

// ─── Proposal lifecycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn submit_proposal_starts_pending_with_resolved_supervisor() {
  let s = store().await;
  let a = s.create_faculty(dr_a()).await.unwrap();
  let student = Uuid::new_v4();

  let p = s.submit_proposal(proposal_for("Dr. A", student)).await.unwrap();
  assert_eq!(p.status, ProposalStatus::Pending);
  assert_eq!(p.supervisor_id, a.id);
  assert_eq!(p.supervisor_name, "Dr. A");
  assert_eq!(p.submitted_by, student);
  assert!(p.comments.is_empty());
}

#[tokio::test]
async fn submit_proposal_with_unknown_supervisor_fails_loudly() {
  let s = store().await;
  let err = s
    .submit_proposal(proposal_for("Dr. Nobody", Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(err.to_string().contains("Dr. Nobody"), "{err}");
}

#[tokio::test]
async fn submit_proposal_rejects_empty_title() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let mut input = proposal_for("Dr. A", Uuid::new_v4());
  input.title = "  ".into();
  assert!(s.submit_proposal(input).await.is_err());
}

#[tokio::test]
async fn students_see_only_their_own_proposals_newest_first() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let alice = Uuid::new_v4();
  let bob   = Uuid::new_v4();

  let first = s.submit_proposal(proposal_for("Dr. A", alice)).await.unwrap();
  let mut second_input = proposal_for("Dr. A", alice);
  second_input.title = "Second idea".into();
  let second = s.submit_proposal(second_input).await.unwrap();
  s.submit_proposal(proposal_for("Dr. A", bob)).await.unwrap();

  let mine = s
    .list_proposals(ProposalScope::SubmittedBy(alice))
    .await
    .unwrap();
  assert_eq!(mine.len(), 2);
  assert!(mine.iter().all(|p| p.submitted_by == alice));
  // Newest first.
  assert_eq!(mine[0].id, second.id);
  assert_eq!(mine[1].id, first.id);

  let all = s.list_proposals(ProposalScope::All).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn status_transition_and_idempotent_reset() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let p = s
    .submit_proposal(proposal_for("Dr. A", Uuid::new_v4()))
    .await
    .unwrap();

  let p = s
    .set_proposal_status(p.id, ProposalStatus::Accepted)
    .await
    .unwrap();
  assert_eq!(p.status, ProposalStatus::Accepted);

  // Setting the same status again succeeds and changes nothing.
  let p = s
    .set_proposal_status(p.id, ProposalStatus::Accepted)
    .await
    .unwrap();
  assert_eq!(p.status, ProposalStatus::Accepted);
  assert!(p.comments.is_empty());
}

#[tokio::test]
async fn accepted_is_terminal() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let p = s
    .submit_proposal(proposal_for("Dr. A", Uuid::new_v4()))
    .await
    .unwrap();

  s.set_proposal_status(p.id, ProposalStatus::Accepted)
    .await
    .unwrap();
  let err = s
    .set_proposal_status(p.id, ProposalStatus::Revision)
    .await
    .unwrap_err();
  assert!(err.to_string().contains("illegal status transition"), "{err}");

  // The stored status is untouched.
  let fetched = s.get_proposal(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, ProposalStatus::Accepted);
}

#[tokio::test]
async fn concurrent_reviews_cannot_overwrite_a_terminal_status() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let p = s
    .submit_proposal(proposal_for("Dr. A", Uuid::new_v4()))
    .await
    .unwrap();

  // Two reviewers decide the same pending proposal at once. Whichever write
  // lands first wins; the other must fail the transition check against the
  // committed terminal status rather than overwrite it.
  let (s1, s2) = (s.clone(), s.clone());
  let id = p.id;
  let accept = tokio::spawn(async move {
    s1.set_proposal_status(id, ProposalStatus::Accepted).await
  });
  let reject = tokio::spawn(async move {
    s2.set_proposal_status(id, ProposalStatus::Rejected).await
  });
  let accept = accept.await.unwrap();
  let reject = reject.await.unwrap();

  assert!(
    accept.is_ok() != reject.is_ok(),
    "exactly one review must win: accept={accept:?} reject={reject:?}"
  );

  let (winner, loser) = if accept.is_ok() {
    (ProposalStatus::Accepted, reject.unwrap_err())
  } else {
    (ProposalStatus::Rejected, accept.unwrap_err())
  };
  assert!(
    loser.to_string().contains("illegal status transition"),
    "{loser}"
  );
  let fetched = s.get_proposal(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, winner);
}

#[tokio::test]
async fn submitted_by_is_immutable_across_lifecycle_operations() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let student = Uuid::new_v4();
  let p = s.submit_proposal(proposal_for("Dr. A", student)).await.unwrap();

  s.set_proposal_status(p.id, ProposalStatus::Revision)
    .await
    .unwrap();
  s.add_comment(p.id, NewComment {
    text:   "Narrow the scope".into(),
    author: "Dr. A".into(),
  })
  .await
  .unwrap();

  let fetched = s.get_proposal(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.submitted_by, student);
  assert_eq!(fetched.submitted_at, p.submitted_at);
}

#[tokio::test]
async fn comments_append_in_order_and_never_reorder() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let p = s
    .submit_proposal(proposal_for("Dr. A", Uuid::new_v4()))
    .await
    .unwrap();

  for text in ["first", "second", "third"] {
    s.add_comment(p.id, NewComment {
      text:   text.into(),
      author: "Admin".into(),
    })
    .await
    .unwrap();
  }

  let fetched = s.get_proposal(p.id).await.unwrap().unwrap();
  let texts: Vec<&str> =
    fetched.comments.iter().map(|c| c.text.as_str()).collect();
  assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn blank_comment_is_rejected_before_any_write() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let p = s
    .submit_proposal(proposal_for("Dr. A", Uuid::new_v4()))
    .await
    .unwrap();

  let err = s
    .add_comment(p.id, NewComment { text: "  ".into(), author: "Admin".into() })
    .await
    .unwrap_err();
  assert!(err.to_string().contains("comment"), "{err}");

  let fetched = s.get_proposal(p.id).await.unwrap().unwrap();
  assert!(fetched.comments.is_empty());
}

#[tokio::test]
async fn only_the_owner_may_delete_a_proposal() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let owner = Uuid::new_v4();
  let p = s.submit_proposal(proposal_for("Dr. A", owner)).await.unwrap();

  let err = s.delete_proposal(p.id, Uuid::new_v4()).await.unwrap_err();
  assert!(err.to_string().contains("not owned"), "{err}");
  assert!(s.get_proposal(p.id).await.unwrap().is_some());

  s.delete_proposal(p.id, owner).await.unwrap();
  assert!(s.get_proposal(p.id).await.unwrap().is_none());
}

// ─── Evaluation slots ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_slot_resolves_faculty_and_starts_available() {
  let s = store().await;
  let a = s.create_faculty(dr_a()).await.unwrap();

  let slot = s.create_slot(slot_for("Dr. A")).await.unwrap();
  assert_eq!(slot.faculty_id, a.id);
  assert_eq!(slot.status, SlotStatus::Available);

  let listed = s.list_slots().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, slot.id);
}

#[tokio::test]
async fn create_slot_for_unknown_faculty_is_a_referential_error() {
  let s = store().await;
  let err = s.create_slot(slot_for("Dr. Nobody")).await.unwrap_err();
  assert!(err.to_string().contains("Dr. Nobody"), "{err}");
  assert!(s.list_slots().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_slot_is_unconditional() {
  let s = store().await;
  s.create_faculty(dr_a()).await.unwrap();
  let slot = s.create_slot(slot_for("Dr. A")).await.unwrap();

  s.delete_slot(slot.id).await.unwrap();
  assert!(s.list_slots().await.unwrap().is_empty());
  assert!(s.delete_slot(slot.id).await.is_err());
}

// ─── Accounts and sessions ───────────────────────────────────────────────────

fn student_account(email: &str) -> NewAccount {
  NewAccount {
    email:         email.into(),
    display_name:  "Sana Iqbal".into(),
    role:          Role::Student,
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
  }
}

#[tokio::test]
async fn create_account_and_find_by_email() {
  let s = store().await;
  let created = s.create_account(student_account("sana@uni.example")).await.unwrap();

  let found = s
    .find_account_by_email("sana@uni.example")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.user_id, created.user_id);
  assert_eq!(found.role, Role::Student);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_account(student_account("sana@uni.example")).await.unwrap();
  let err = s
    .create_account(student_account("sana@uni.example"))
    .await
    .unwrap_err();
  assert!(err.to_string().contains("already exists"), "{err}");
}

#[tokio::test]
async fn session_round_trip_and_revocation() {
  let s = store().await;
  let account = s.create_account(student_account("sana@uni.example")).await.unwrap();

  s.create_session(account.user_id, "digest-1").await.unwrap();
  let resolved = s.find_session("digest-1").await.unwrap().unwrap();
  assert_eq!(resolved.user_id, account.user_id);

  s.delete_session("digest-1").await.unwrap();
  assert!(s.find_session("digest-1").await.unwrap().is_none());

  // Revoking an unknown digest is not an error.
  s.delete_session("digest-1").await.unwrap();
}

#[tokio::test]
async fn deleting_an_account_revokes_its_sessions() {
  let s = store().await;
  let account = s.create_account(student_account("sana@uni.example")).await.unwrap();
  s.create_session(account.user_id, "digest-1").await.unwrap();
  s.create_session(account.user_id, "digest-2").await.unwrap();

  s.delete_account(account.user_id).await.unwrap();
  assert!(s.find_session("digest-1").await.unwrap().is_none());
  assert!(s.find_session("digest-2").await.unwrap().is_none());
  assert!(s.get_account(account.user_id).await.unwrap().is_none());
}
