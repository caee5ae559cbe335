//! Faculty records and the roster filter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Domain ──────────────────────────────────────────────────────────────────

/// The nine research domains a supervisor may belong to. Closed set; the
/// roster filter matches against the human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
  Ai,
  Cybersecurity,
  DataScience,
  Networks,
  WebDevelopment,
  MachineLearning,
  CloudComputing,
  SoftwareEngineering,
  Iot,
}

impl Domain {
  /// Display label, as shown in dashboards and matched by the filter.
  pub fn label(self) -> &'static str {
    match self {
      Domain::Ai => "AI",
      Domain::Cybersecurity => "Cybersecurity",
      Domain::DataScience => "Data Science",
      Domain::Networks => "Networks",
      Domain::WebDevelopment => "Web Development",
      Domain::MachineLearning => "Machine Learning",
      Domain::CloudComputing => "Cloud Computing",
      Domain::SoftwareEngineering => "Software Engineering",
      Domain::Iot => "IoT",
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A supervisor on the roster. `slots` is the number of student projects the
/// supervisor can still take on; the unsigned type keeps it non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyRecord {
  pub id:           Uuid,
  pub name:         String,
  pub email:        String,
  pub domain:       Domain,
  pub slots:        u32,
  pub office_hours: String,
}

/// Input to faculty creation and (full-overwrite) update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFaculty {
  pub name:         String,
  pub email:        String,
  pub domain:       Domain,
  pub slots:        u32,
  pub office_hours: String,
}

impl NewFaculty {
  /// Reject empty required fields before any store write is issued.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::EmptyField("email"));
    }
    if self.office_hours.trim().is_empty() {
      return Err(Error::EmptyField("office_hours"));
    }
    Ok(())
  }
}

/// Outcome of a cascading faculty delete. `slots_deleted` is the number of
/// evaluation slots removed alongside the record, so callers can observe the
/// N+1 deletion count.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CascadeReport {
  pub faculty_id:    Uuid,
  pub slots_deleted: usize,
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::RecordStore::list_faculty`].
/// All filters are optional and combine with logical AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacultyFilter {
  /// Case-insensitive substring match over the domain label.
  pub domain:       Option<String>,
  /// Case-insensitive substring match over the office-hours text.
  pub office_hours: Option<String>,
  /// Keep records with at least this many open slots.
  pub min_slots:    Option<u32>,
}

impl FacultyFilter {
  pub fn matches(&self, record: &FacultyRecord) -> bool {
    let domain_ok = self.domain.as_deref().is_none_or(|d| {
      record
        .domain
        .label()
        .to_lowercase()
        .contains(&d.to_lowercase())
    });
    let office_ok = self.office_hours.as_deref().is_none_or(|o| {
      record
        .office_hours
        .to_lowercase()
        .contains(&o.to_lowercase())
    });
    let slots_ok = self.min_slots.is_none_or(|min| record.slots >= min);
    domain_ok && office_ok && slots_ok
  }
}
