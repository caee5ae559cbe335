//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates and times as ISO 8601.
//! Comments are stored as a compact JSON array. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fyp_core::{
  account::{Role, UserAccount},
  faculty::{Domain, FacultyRecord},
  proposal::{Comment, Proposal, ProposalStatus},
  slot::{EvaluationSlot, SlotStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Student => "student",
    Role::Faculty => "faculty",
    Role::Admin => "admin",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "student" => Ok(Role::Student),
    "faculty" => Ok(Role::Faculty),
    "admin" => Ok(Role::Admin),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── Domain ──────────────────────────────────────────────────────────────────

pub fn encode_domain(d: Domain) -> &'static str {
  match d {
    Domain::Ai => "ai",
    Domain::Cybersecurity => "cybersecurity",
    Domain::DataScience => "data_science",
    Domain::Networks => "networks",
    Domain::WebDevelopment => "web_development",
    Domain::MachineLearning => "machine_learning",
    Domain::CloudComputing => "cloud_computing",
    Domain::SoftwareEngineering => "software_engineering",
    Domain::Iot => "iot",
  }
}

pub fn decode_domain(s: &str) -> Result<Domain> {
  match s {
    "ai" => Ok(Domain::Ai),
    "cybersecurity" => Ok(Domain::Cybersecurity),
    "data_science" => Ok(Domain::DataScience),
    "networks" => Ok(Domain::Networks),
    "web_development" => Ok(Domain::WebDevelopment),
    "machine_learning" => Ok(Domain::MachineLearning),
    "cloud_computing" => Ok(Domain::CloudComputing),
    "software_engineering" => Ok(Domain::SoftwareEngineering),
    "iot" => Ok(Domain::Iot),
    other => Err(Error::Decode(format!("unknown domain: {other:?}"))),
  }
}

// ─── Statuses ────────────────────────────────────────────────────────────────

pub fn encode_status(s: ProposalStatus) -> &'static str {
  match s {
    ProposalStatus::Pending => "pending",
    ProposalStatus::Accepted => "accepted",
    ProposalStatus::Rejected => "rejected",
    ProposalStatus::Revision => "revision",
  }
}

pub fn decode_status(s: &str) -> Result<ProposalStatus> {
  match s {
    "pending" => Ok(ProposalStatus::Pending),
    "accepted" => Ok(ProposalStatus::Accepted),
    "rejected" => Ok(ProposalStatus::Rejected),
    "revision" => Ok(ProposalStatus::Revision),
    other => Err(Error::Decode(format!("unknown proposal status: {other:?}"))),
  }
}

pub fn encode_slot_status(s: SlotStatus) -> &'static str {
  match s {
    SlotStatus::Available => "available",
    SlotStatus::Booked => "booked",
  }
}

pub fn decode_slot_status(s: &str) -> Result<SlotStatus> {
  match s {
    "available" => Ok(SlotStatus::Available),
    "booked" => Ok(SlotStatus::Booked),
    other => Err(Error::Decode(format!("unknown slot status: {other:?}"))),
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

pub fn encode_comments(comments: &[Comment]) -> Result<String> {
  Ok(serde_json::to_string(comments)?)
}

pub fn decode_comments(s: &str) -> Result<Vec<Comment>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub user_id:       String,
  pub email:         String,
  pub display_name:  String,
  pub role:          String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<UserAccount> {
    Ok(UserAccount {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      display_name:  self.display_name,
      role:          decode_role(&self.role)?,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `faculty` row.
pub struct RawFaculty {
  pub id:           String,
  pub name:         String,
  pub email:        String,
  pub domain:       String,
  pub slots:        i64,
  pub office_hours: String,
}

impl RawFaculty {
  pub fn into_record(self) -> Result<FacultyRecord> {
    Ok(FacultyRecord {
      id:           decode_uuid(&self.id)?,
      name:         self.name,
      email:        self.email,
      domain:       decode_domain(&self.domain)?,
      slots:        u32::try_from(self.slots)
        .map_err(|_| Error::Decode(format!("negative slots: {}", self.slots)))?,
      office_hours: self.office_hours,
    })
  }
}

/// Raw strings read directly from a `proposals` row.
pub struct RawProposal {
  pub id:              String,
  pub title:           String,
  pub description:     String,
  pub supervisor_id:   String,
  pub supervisor_name: String,
  pub status:          String,
  pub submitted_by:    String,
  pub submitted_at:    String,
  pub student_name:    String,
  pub student_email:   String,
  pub comments:        String,
}

impl RawProposal {
  pub fn into_proposal(self) -> Result<Proposal> {
    Ok(Proposal {
      id:              decode_uuid(&self.id)?,
      title:           self.title,
      description:     self.description,
      supervisor_id:   decode_uuid(&self.supervisor_id)?,
      supervisor_name: self.supervisor_name,
      status:          decode_status(&self.status)?,
      submitted_by:    decode_uuid(&self.submitted_by)?,
      submitted_at:    decode_dt(&self.submitted_at)?,
      student_name:    self.student_name,
      student_email:   self.student_email,
      comments:        decode_comments(&self.comments)?,
    })
  }
}

/// Raw strings read directly from an `evaluation_slots` row.
pub struct RawSlot {
  pub id:           String,
  pub faculty_name: String,
  pub faculty_id:   String,
  pub date:         String,
  pub time:         String,
  pub status:       String,
}

impl RawSlot {
  pub fn into_slot(self) -> Result<EvaluationSlot> {
    Ok(EvaluationSlot {
      id:           decode_uuid(&self.id)?,
      faculty_name: self.faculty_name,
      faculty_id:   decode_uuid(&self.faculty_id)?,
      date:         decode_date(&self.date)?,
      time:         decode_time(&self.time)?,
      status:       decode_slot_status(&self.status)?,
    })
  }
}
