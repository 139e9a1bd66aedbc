//! Attendance records — the append-only "who showed up when" log.
//!
//! Records are written exclusively by the check-in resolver and are never
//! updated or deleted. Duplicate records from racing scans are accepted;
//! deduplication, if wanted, belongs in a storage-level constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a check-in request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  Frontdesk,
  Mobile,
}

/// One recorded check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
  pub attendance_id:     Uuid,
  pub student_id:        Uuid,
  /// The schedule the check-in resolved to; `None` for legacy rows recorded
  /// outside any session window.
  pub schedule_id:       Option<Uuid>,
  pub scanned_at:        DateTime<Utc>,
  /// Opaque device identifier, stored for audit only.
  pub device_id:         Option<String>,
  pub source:            Source,
  pub location_verified: bool,
}

/// Input for one attendance insert. The store assigns the UUID.
#[derive(Debug, Clone)]
pub struct NewAttendance {
  pub student_id:        Uuid,
  pub schedule_id:       Option<Uuid>,
  pub scanned_at:        DateTime<Utc>,
  pub device_id:         Option<String>,
  pub source:            Source,
  pub location_verified: bool,
}

/// Filters for the admin attendance listing.
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
  pub student_id:  Option<Uuid>,
  pub schedule_id: Option<Uuid>,
  pub from:        Option<DateTime<Utc>>,
  pub to:          Option<DateTime<Utc>>,
  pub limit:       Option<usize>,
}
