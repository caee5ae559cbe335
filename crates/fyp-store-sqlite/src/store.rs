//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`] and
//! [`AccountStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use fyp_core::{
  account::{NewAccount, UserAccount},
  faculty::{CascadeReport, FacultyFilter, FacultyRecord, NewFaculty},
  proposal::{
    Comment, NewComment, NewProposal, Proposal, ProposalScope, ProposalStatus,
  },
  slot::{EvaluationSlot, NewSlot, SlotStatus},
  store::{AccountStore, RecordStore},
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawFaculty, RawProposal, RawSlot, encode_comments, encode_date,
    decode_status, encode_domain, encode_dt, encode_role, encode_slot_status,
    encode_status, encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

const PROPOSAL_COLS: &str = "id, title, description, supervisor_id, \
   supervisor_name, status, submitted_by, submitted_at, student_name, \
   student_email, comments";

fn proposal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProposal> {
  Ok(RawProposal {
    id:              row.get(0)?,
    title:           row.get(1)?,
    description:     row.get(2)?,
    supervisor_id:   row.get(3)?,
    supervisor_name: row.get(4)?,
    status:          row.get(5)?,
    submitted_by:    row.get(6)?,
    submitted_at:    row.get(7)?,
    student_name:    row.get(8)?,
    student_email:   row.get(9)?,
    comments:        row.get(10)?,
  })
}

fn faculty_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFaculty> {
  Ok(RawFaculty {
    id:           row.get(0)?,
    name:         row.get(1)?,
    email:        row.get(2)?,
    domain:       row.get(3)?,
    slots:        row.get(4)?,
    office_hours: row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An FYP portal store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialised on the connection's worker thread, so multi-statement
/// writes issued within one closure cannot interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Faculty roster ────────────────────────────────────────────────────────

  async fn list_faculty(
    &self,
    filter: &FacultyFilter,
  ) -> Result<Vec<FacultyRecord>> {
    let raws: Vec<RawFaculty> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, email, domain, slots, office_hours FROM faculty",
        )?;
        let rows = stmt
          .query_map([], faculty_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // The substring filters run over decoded labels, so filtering happens
    // here rather than in SQL.
    let records: Vec<FacultyRecord> = raws
      .into_iter()
      .map(RawFaculty::into_record)
      .collect::<Result<_>>()?;

    Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
  }

  async fn get_faculty(&self, id: Uuid) -> Result<Option<FacultyRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFaculty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, email, domain, slots, office_hours
               FROM faculty WHERE id = ?1",
              rusqlite::params![id_str],
              faculty_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFaculty::into_record).transpose()
  }

  async fn find_faculty_by_name(
    &self,
    name: &str,
  ) -> Result<Option<FacultyRecord>> {
    let name = name.to_owned();

    let raw: Option<RawFaculty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, email, domain, slots, office_hours
               FROM faculty WHERE name = ?1",
              rusqlite::params![name],
              faculty_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFaculty::into_record).transpose()
  }

  async fn create_faculty(&self, input: NewFaculty) -> Result<FacultyRecord> {
    input.validate()?;

    let record = FacultyRecord {
      id:           Uuid::new_v4(),
      name:         input.name,
      email:        input.email,
      domain:       input.domain,
      slots:        input.slots,
      office_hours: input.office_hours,
    };

    let id_str       = encode_uuid(record.id);
    let name         = record.name.clone();
    let email        = record.email.clone();
    let domain_str   = encode_domain(record.domain).to_owned();
    let slots        = i64::from(record.slots);
    let office_hours = record.office_hours.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO faculty (id, name, email, domain, slots, office_hours)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, domain_str, slots, office_hours],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn update_faculty(
    &self,
    id: Uuid,
    input: NewFaculty,
  ) -> Result<FacultyRecord> {
    input.validate()?;

    let record = FacultyRecord {
      id,
      name:         input.name,
      email:        input.email,
      domain:       input.domain,
      slots:        input.slots,
      office_hours: input.office_hours,
    };

    let id_str       = encode_uuid(id);
    let name         = record.name.clone();
    let email        = record.email.clone();
    let domain_str   = encode_domain(record.domain).to_owned();
    let slots        = i64::from(record.slots);
    let office_hours = record.office_hours.clone();

    // Full-record overwrite; last writer wins, no version check.
    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE faculty
           SET name = ?2, email = ?3, domain = ?4, slots = ?5, office_hours = ?6
           WHERE id = ?1",
          rusqlite::params![id_str, name, email, domain_str, slots, office_hours],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Err(fyp_core::Error::FacultyNotFound(id).into());
    }
    Ok(record)
  }

  async fn delete_faculty(&self, id: Uuid) -> Result<CascadeReport> {
    let id_str = encode_uuid(id);

    // Slot deletes and the record delete commit together or not at all, so
    // a partial cascade cannot leave orphaned slots behind.
    let outcome: Option<usize> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let slots = tx.execute(
          "DELETE FROM evaluation_slots WHERE faculty_id = ?1",
          rusqlite::params![id_str],
        )?;
        let records = tx.execute(
          "DELETE FROM faculty WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        if records == 0 {
          tx.rollback()?;
          return Ok(None);
        }
        tx.commit()?;
        Ok(Some(slots))
      })
      .await?;

    match outcome {
      Some(slots_deleted) => Ok(CascadeReport { faculty_id: id, slots_deleted }),
      None => Err(fyp_core::Error::FacultyNotFound(id).into()),
    }
  }

  // ── Proposal lifecycle ────────────────────────────────────────────────────

  async fn submit_proposal(&self, input: NewProposal) -> Result<Proposal> {
    input.validate()?;

    let supervisor = self
      .find_faculty_by_name(&input.supervisor_name)
      .await?
      .ok_or_else(|| {
        fyp_core::Error::UnknownFaculty(input.supervisor_name.clone())
      })?;

    let proposal = Proposal {
      id:              Uuid::new_v4(),
      title:           input.title,
      description:     input.description,
      supervisor_id:   supervisor.id,
      supervisor_name: supervisor.name,
      status:          ProposalStatus::Pending,
      submitted_by:    input.submitted_by,
      submitted_at:    Utc::now(),
      student_name:    input.student_name,
      student_email:   input.student_email,
      comments:        Vec::new(),
    };

    let id_str          = encode_uuid(proposal.id);
    let title           = proposal.title.clone();
    let description     = proposal.description.clone();
    let supervisor_id   = encode_uuid(proposal.supervisor_id);
    let supervisor_name = proposal.supervisor_name.clone();
    let status_str      = encode_status(proposal.status).to_owned();
    let submitted_by    = encode_uuid(proposal.submitted_by);
    let submitted_at    = encode_dt(proposal.submitted_at);
    let student_name    = proposal.student_name.clone();
    let student_email   = proposal.student_email.clone();
    let comments_json   = encode_comments(&proposal.comments)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO proposals (
             id, title, description, supervisor_id, supervisor_name,
             status, submitted_by, submitted_at, student_name,
             student_email, comments
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            title,
            description,
            supervisor_id,
            supervisor_name,
            status_str,
            submitted_by,
            submitted_at,
            student_name,
            student_email,
            comments_json,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(proposal)
  }

  async fn get_proposal(&self, id: Uuid) -> Result<Option<Proposal>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProposal> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROPOSAL_COLS} FROM proposals WHERE id = ?1"),
              rusqlite::params![id_str],
              proposal_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProposal::into_proposal).transpose()
  }

  async fn list_proposals(&self, scope: ProposalScope) -> Result<Vec<Proposal>> {
    let submitter = match scope {
      ProposalScope::SubmittedBy(uid) => Some(encode_uuid(uid)),
      ProposalScope::All => None,
    };

    let raws: Vec<RawProposal> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(by) = submitter {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROPOSAL_COLS} FROM proposals
             WHERE submitted_by = ?1
             ORDER BY submitted_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![by], proposal_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROPOSAL_COLS} FROM proposals
             ORDER BY submitted_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map([], proposal_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProposal::into_proposal).collect()
  }

  async fn set_proposal_status(
    &self,
    id: Uuid,
    status: ProposalStatus,
  ) -> Result<Proposal> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status).to_owned();

    // Read, check, and write in one transaction within one closure, so two
    // concurrent reviews serialise and the loser checks against the winner's
    // committed status. Re-setting the current status issues no write at all.
    let outcome: Option<(RawProposal, bool)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<RawProposal> = tx
          .query_row(
            &format!("SELECT {PROPOSAL_COLS} FROM proposals WHERE id = ?1"),
            rusqlite::params![id_str],
            proposal_from_row,
          )
          .optional()?;
        let Some(mut raw) = current else {
          tx.rollback()?;
          return Ok(None);
        };

        match decode_status(&raw.status).ok() {
          Some(from) if from == status => {
            tx.commit()?;
            Ok(Some((raw, true)))
          }
          Some(from) if from.can_transition_to(status) => {
            tx.execute(
              "UPDATE proposals SET status = ?2 WHERE id = ?1",
              rusqlite::params![id_str, status_str],
            )?;
            tx.commit()?;
            raw.status = status_str;
            Ok(Some((raw, true)))
          }
          // Illegal transition, or a stored status that does not decode; the
          // row is left untouched and the caller rebuilds the typed error.
          _ => {
            tx.rollback()?;
            Ok(Some((raw, false)))
          }
        }
      })
      .await?;

    let Some((raw, applied)) = outcome else {
      return Err(fyp_core::Error::ProposalNotFound(id).into());
    };
    let proposal = raw.into_proposal()?;
    if !applied {
      proposal.status.check_transition(status).map_err(Error::Core)?;
    }
    Ok(proposal)
  }

  async fn add_comment(
    &self,
    id: Uuid,
    comment: NewComment,
  ) -> Result<Proposal> {
    comment.validate()?;

    let stored = Comment {
      text:   comment.text,
      author: comment.author,
      date:   Utc::now().date_naive(),
    };

    let id_str       = encode_uuid(id);
    let comment_json = serde_json::to_string(&stored)?;

    // Single-statement append via json_insert's '$[#]' path: prior comments
    // are untouched and order is preserved by construction.
    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE proposals
           SET comments = json_insert(comments, '$[#]', json(?2))
           WHERE id = ?1",
          rusqlite::params![id_str, comment_json],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Err(fyp_core::Error::ProposalNotFound(id).into());
    }

    self
      .get_proposal(id)
      .await?
      .ok_or_else(|| fyp_core::Error::ProposalNotFound(id).into())
  }

  async fn delete_proposal(&self, id: Uuid, requested_by: Uuid) -> Result<()> {
    let proposal = self
      .get_proposal(id)
      .await?
      .ok_or(fyp_core::Error::ProposalNotFound(id))?;

    if proposal.submitted_by != requested_by {
      return Err(fyp_core::Error::NotProposalOwner(id).into());
    }

    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM proposals WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Evaluation slots ──────────────────────────────────────────────────────

  async fn list_slots(&self) -> Result<Vec<EvaluationSlot>> {
    let raws: Vec<RawSlot> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, faculty_name, faculty_id, date, time, status
           FROM evaluation_slots ORDER BY date, time",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSlot {
              id:           row.get(0)?,
              faculty_name: row.get(1)?,
              faculty_id:   row.get(2)?,
              date:         row.get(3)?,
              time:         row.get(4)?,
              status:       row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSlot::into_slot).collect()
  }

  async fn create_slot(&self, input: NewSlot) -> Result<EvaluationSlot> {
    input.validate()?;

    let faculty = self
      .find_faculty_by_name(&input.faculty_name)
      .await?
      .ok_or_else(|| {
        fyp_core::Error::UnknownFaculty(input.faculty_name.clone())
      })?;

    let slot = EvaluationSlot {
      id:           Uuid::new_v4(),
      faculty_name: faculty.name,
      faculty_id:   faculty.id,
      date:         input.date,
      time:         input.time,
      status:       SlotStatus::Available,
    };

    let id_str       = encode_uuid(slot.id);
    let faculty_name = slot.faculty_name.clone();
    let faculty_id   = encode_uuid(slot.faculty_id);
    let date_str     = encode_date(slot.date);
    let time_str     = encode_time(slot.time);
    let status_str   = encode_slot_status(slot.status).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO evaluation_slots
             (id, faculty_name, faculty_id, date, time, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            faculty_name,
            faculty_id,
            date_str,
            time_str,
            status_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(slot)
  }

  async fn delete_slot(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM evaluation_slots WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Err(fyp_core::Error::SlotNotFound(id).into());
    }
    Ok(())
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  async fn create_account(&self, input: NewAccount) -> Result<UserAccount> {
    let account = UserAccount {
      user_id:       Uuid::new_v4(),
      email:         input.email,
      display_name:  input.display_name,
      role:          input.role,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str        = encode_uuid(account.user_id);
    let email         = account.email.clone();
    let display_name  = account.display_name.clone();
    let role_str      = encode_role(account.role).to_owned();
    let password_hash = account.password_hash.clone();
    let created_at    = encode_dt(account.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM accounts WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO accounts
             (user_id, email, display_name, role, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            email,
            display_name,
            role_str,
            password_hash,
            created_at,
          ],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(fyp_core::Error::EmailTaken(account.email).into());
    }
    Ok(account)
  }

  async fn find_account_by_email(
    &self,
    email: &str,
  ) -> Result<Option<UserAccount>> {
    let email = email.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, display_name, role, password_hash,
                      created_at
               FROM accounts WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(RawAccount {
                  user_id:       row.get(0)?,
                  email:         row.get(1)?,
                  display_name:  row.get(2)?,
                  role:          row.get(3)?,
                  password_hash: row.get(4)?,
                  created_at:    row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn get_account(&self, user_id: Uuid) -> Result<Option<UserAccount>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, display_name, role, password_hash,
                      created_at
               FROM accounts WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawAccount {
                  user_id:       row.get(0)?,
                  email:         row.get(1)?,
                  display_name:  row.get(2)?,
                  role:          row.get(3)?,
                  password_hash: row.get(4)?,
                  created_at:    row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn delete_account(&self, user_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(user_id);

    // Sessions go first (FK) and in the same transaction, so a deleted
    // account can never leave a live session behind.
    let deleted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM sessions WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        let n = tx.execute(
          "DELETE FROM accounts WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        if n == 0 {
          tx.rollback()?;
          return Ok(false);
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !deleted {
      return Err(fyp_core::Error::AccountNotFound(user_id).into());
    }
    Ok(())
  }

  async fn create_session(
    &self,
    user_id: Uuid,
    token_digest: &str,
  ) -> Result<()> {
    let id_str     = encode_uuid(user_id);
    let digest     = token_digest.to_owned();
    let created_at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_digest, user_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![digest, id_str, created_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_session(
    &self,
    token_digest: &str,
  ) -> Result<Option<UserAccount>> {
    let digest = token_digest.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT a.user_id, a.email, a.display_name, a.role,
                      a.password_hash, a.created_at
               FROM sessions s
               JOIN accounts a ON a.user_id = s.user_id
               WHERE s.token_digest = ?1",
              rusqlite::params![digest],
              |row| {
                Ok(RawAccount {
                  user_id:       row.get(0)?,
                  email:         row.get(1)?,
                  display_name:  row.get(2)?,
                  role:          row.get(3)?,
                  password_hash: row.get(4)?,
                  created_at:    row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn delete_session(&self, token_digest: &str) -> Result<()> {
    let digest = token_digest.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![digest],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
