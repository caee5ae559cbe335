//! Evaluation scheduling slots.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Availability of an evaluation slot.
///
/// No operation currently transitions a slot to `booked`; the student-facing
/// booking flow is out of scope. The variant is kept so stored data
/// round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
  Available,
  Booked,
}

/// A scheduling slot for project evaluation, tied to a faculty record.
/// `faculty_id` is authoritative; `faculty_name` is a denormalized display
/// copy. Slots referencing a faculty record are deleted together with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSlot {
  pub id:           Uuid,
  pub faculty_name: String,
  pub faculty_id:   Uuid,
  pub date:         NaiveDate,
  pub time:         NaiveTime,
  pub status:       SlotStatus,
}

/// Input to [`crate::store::RecordStore::create_slot`]. The faculty is given
/// by name and must resolve to an existing record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSlot {
  pub faculty_name: String,
  pub date:         NaiveDate,
  pub time:         NaiveTime,
}

impl NewSlot {
  pub fn validate(&self) -> Result<()> {
    if self.faculty_name.trim().is_empty() {
      return Err(Error::EmptyField("faculty_name"));
    }
    Ok(())
  }
}
