//! Student — the member record the front desk scans against.
//!
//! The student number is the human-facing identity printed on membership
//! cards and encoded in barcodes. It is unique and never changes once
//! assigned; the UUID exists only as a stable database key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership eligibility state. Mutated by administrative action only —
/// the check-in resolver reads it but never writes it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
  #[default]
  Active,
  Inactive,
  Overdue,
}

impl Standing {
  pub fn is_active(self) -> bool { self == Standing::Active }
}

/// A gym member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
  pub student_id:          Uuid,
  pub student_number:      i64,
  pub first_name:          Option<String>,
  pub last_name:           Option<String>,
  pub membership_standing: Standing,
  pub created_at:          DateTime<Utc>,
}

impl Student {
  /// Display name: the non-empty name parts joined with a space.
  pub fn full_name(&self) -> String {
    let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
      .into_iter()
      .flatten()
      .filter(|p| !p.trim().is_empty())
      .collect();
    parts.join(" ")
  }

  /// The flattened per-student shape returned on the wire.
  pub fn summary(&self) -> StudentSummary {
    StudentSummary {
      id:                  self.student_id,
      student_number:      self.student_number,
      full_name:           self.full_name(),
      membership_standing: self.membership_standing,
    }
  }
}

/// The student fields every front-end renders in check-in results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
  pub id:                  Uuid,
  pub student_number:      i64,
  pub full_name:           String,
  pub membership_standing: Standing,
}

/// Input for creating a student. The store assigns the UUID and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
  pub student_number:      i64,
  pub first_name:          Option<String>,
  pub last_name:           Option<String>,
  #[serde(default)]
  pub membership_standing: Standing,
}

/// Partial update applied to an existing student. The student number is
/// immutable and deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
  pub first_name:          Option<String>,
  pub last_name:           Option<String>,
  pub membership_standing: Option<Standing>,
}
