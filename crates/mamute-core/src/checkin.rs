//! The check-in resolver.
//!
//! Given a scanned barcode or an explicit list of student numbers, resolve
//! the target students, pick the one eligible class session for "now" in the
//! gym's timezone, evaluate the access/standing/location gates per student,
//! and append one attendance record per admitted student.
//!
//! Call-level failures (bad identification, unknown students, missing
//! access, no eligible class) abort before any write. Failures of an
//! individual attendance insert are reported inline on that student's
//! result and do not abort siblings.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  attendance::{AttendanceRecord, NewAttendance, Source},
  clock::Clock,
  schedule::ScheduleTemplate,
  store::GymStore,
  student::{Student, StudentSummary},
};

/// Half-width of the session eligibility window, in minutes. A template
/// starting at `t` is eligible iff now is within `[t - 30, t + 30]`
/// inclusive.
pub const SESSION_WINDOW_MINUTES: i32 = 30;

/// Reason reported when a mobile check-in is blocked on standing.
pub const REASON_MEMBERSHIP_NOT_ACTIVE: &str = "MEMBERSHIP_NOT_ACTIVE";

// ─── Request / outcome ───────────────────────────────────────────────────────

/// One check-in call, as received from any front-end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
  /// Raw scanned barcode, `<PREFIX><digits>`. Ignored when
  /// `student_numbers` is non-empty.
  pub barcode:           Option<String>,
  pub student_numbers:   Option<Vec<i64>>,
  /// Opaque device identifier, stored for audit only.
  pub device_id:         Option<String>,
  pub source:            Source,
  #[serde(default)]
  pub location_verified: bool,
  /// The authenticated caller. Required when `source` is mobile; resolved
  /// by the transport layer, never trusted from the body.
  #[serde(skip)]
  pub caller_account_id: Option<Uuid>,
}

/// The resolved session plus per-student decisions, in request order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinOutcome {
  pub schedule: ScheduleTemplate,
  pub results:  Vec<CheckinResult>,
}

/// The decision for one student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResult {
  pub student:    StudentSummary,
  pub blocked:    bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attendance: Option<AttendanceRecord>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Call-level failures. None of these leaves partial results behind.
#[derive(Debug, Error)]
pub enum CheckinError {
  /// Neither a parseable barcode nor any student numbers were supplied.
  #[error("no usable identification in request")]
  MissingIdentification,

  /// At least one requested number matched no student. All-or-nothing: the
  /// known students are not checked in either.
  #[error("unknown student numbers: {missing:?}")]
  StudentsNotFound { missing: Vec<i64> },

  /// Mobile source without an authenticated caller.
  #[error("mobile check-in requires an authenticated account")]
  Unauthorized,

  /// Mobile source without a verified location.
  #[error("mobile check-in requires a verified location")]
  LocationRequired,

  /// The caller lacks an access link to at least one target student.
  #[error("caller has no access link to every requested student")]
  AccessDenied,

  /// No active template starts within the session window right now.
  #[error("no class is available for check-in right now")]
  NoClassAvailable,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CheckinError {
  /// Stable machine-readable code, dispatched on by every front-end.
  pub fn code(&self) -> &'static str {
    match self {
      CheckinError::MissingIdentification => "MISSING_IDENTIFICATION",
      CheckinError::StudentsNotFound { .. } => "STUDENTS_NOT_FOUND",
      CheckinError::Unauthorized => "UNAUTHORIZED",
      CheckinError::LocationRequired => "LOCATION_REQUIRED",
      CheckinError::AccessDenied => "ACCESS_DENIED",
      CheckinError::NoClassAvailable => "NO_CLASS_AVAILABLE",
      CheckinError::Store(_) => "SERVER_ERROR",
    }
  }
}

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> CheckinError {
  CheckinError::Store(Box::new(e))
}

// ─── Identification parsing ──────────────────────────────────────────────────

/// Normalise the request's identification into a deduplicated list of
/// positive student numbers, preserving first-seen order.
///
/// Explicit `student_numbers` win over the barcode. Barcode parsing strips
/// the configured prefix once (if present) and integer-parses the rest.
/// A non-positive number anywhere in the list fails the whole call — it can
/// never match a student, and dropping it silently would check the valid
/// siblings in while hiding the bad entry.
pub fn parse_identification(
  request: &CheckinRequest,
  barcode_prefix: &str,
) -> Result<Vec<i64>, CheckinError> {
  let raw: Vec<i64> = match &request.student_numbers {
    Some(numbers) if !numbers.is_empty() => numbers.clone(),
    _ => match &request.barcode {
      Some(barcode) => parse_barcode(barcode, barcode_prefix)
        .map(|n| vec![n])
        .ok_or(CheckinError::MissingIdentification)?,
      None => return Err(CheckinError::MissingIdentification),
    },
  };

  let mut numbers = Vec::with_capacity(raw.len());
  for n in raw {
    if n <= 0 {
      return Err(CheckinError::MissingIdentification);
    }
    if !numbers.contains(&n) {
      numbers.push(n);
    }
  }

  if numbers.is_empty() {
    return Err(CheckinError::MissingIdentification);
  }
  Ok(numbers)
}

fn parse_barcode(barcode: &str, prefix: &str) -> Option<i64> {
  let trimmed = barcode.trim();
  let digits = trimmed.strip_prefix(prefix).unwrap_or(trimmed);
  digits.parse::<i64>().ok().filter(|n| *n > 0)
}

// ─── Session window ──────────────────────────────────────────────────────────

/// Resolve an instant to `(day_of_week, minute_of_day)` in `tz`, with
/// 0 = Sunday.
pub fn local_day_and_minute(now: DateTime<Utc>, tz: Tz) -> (u8, i32) {
  let local = now.with_timezone(&tz);
  let day = chrono::Datelike::weekday(&local).num_days_from_sunday() as u8;
  let minute = (local.hour() * 60 + local.minute()) as i32;
  (day, minute)
}

/// Pick the eligible template: start time within the inclusive window around
/// `now_minutes`, tie broken by the earliest start regardless of input
/// order.
pub fn eligible_schedule(
  templates: &[ScheduleTemplate],
  now_minutes: i32,
) -> Option<&ScheduleTemplate> {
  templates
    .iter()
    .filter(|t| {
      let start = t.start_minutes();
      start >= now_minutes - SESSION_WINDOW_MINUTES
        && start <= now_minutes + SESSION_WINDOW_MINUTES
    })
    .min_by_key(|t| t.start_minutes())
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Run one check-in call end to end. See the module docs for the failure
/// tiers; no attendance is written unless every call-level gate has passed.
pub async fn resolve<S: GymStore>(
  store: &S,
  clock: &dyn Clock,
  request: CheckinRequest,
) -> Result<CheckinOutcome, CheckinError> {
  if request.source == Source::Mobile && request.caller_account_id.is_none() {
    return Err(CheckinError::Unauthorized);
  }
  if request.source == Source::Mobile && !request.location_verified {
    return Err(CheckinError::LocationRequired);
  }

  let settings = store.get_settings().await.map_err(store_err)?;
  let numbers = parse_identification(&request, &settings.barcode_prefix)?;

  let found = store
    .find_students_by_numbers(numbers.clone())
    .await
    .map_err(store_err)?;

  let missing: Vec<i64> = numbers
    .iter()
    .copied()
    .filter(|n| !found.iter().any(|s| s.student_number == *n))
    .collect();
  if !missing.is_empty() {
    return Err(CheckinError::StudentsNotFound { missing });
  }

  // Report results in the order the numbers were requested.
  let mut students: Vec<Student> = Vec::with_capacity(numbers.len());
  for n in &numbers {
    if let Some(s) = found.iter().find(|s| s.student_number == *n) {
      students.push(s.clone());
    }
  }

  if request.source == Source::Mobile {
    let caller = request
      .caller_account_id
      .ok_or(CheckinError::Unauthorized)?;
    let ids: Vec<Uuid> = students.iter().map(|s| s.student_id).collect();
    let allowed = store.has_access(caller, ids).await.map_err(store_err)?;
    if !allowed {
      return Err(CheckinError::AccessDenied);
    }
  }

  let now = clock.now();
  let (day, minute) = local_day_and_minute(now, settings.resolve_timezone());
  let templates = store
    .find_active_schedules_by_day(day)
    .await
    .map_err(store_err)?;
  let schedule = eligible_schedule(&templates, minute)
    .cloned()
    .ok_or(CheckinError::NoClassAvailable)?;

  let mut results = Vec::with_capacity(students.len());
  for student in &students {
    // Mobile enforces standing; the front desk can always wave a member
    // through. Intentional policy asymmetry.
    if request.source == Source::Mobile
      && !student.membership_standing.is_active()
    {
      results.push(CheckinResult {
        student:    student.summary(),
        blocked:    true,
        reason:     Some(REASON_MEMBERSHIP_NOT_ACTIVE.to_owned()),
        attendance: None,
      });
      continue;
    }

    let insert = store
      .insert_attendance(NewAttendance {
        student_id:        student.student_id,
        schedule_id:       Some(schedule.schedule_id),
        scanned_at:        now,
        device_id:         request.device_id.clone(),
        source:            request.source,
        location_verified: request.location_verified,
      })
      .await;

    results.push(match insert {
      Ok(record) => CheckinResult {
        student:    student.summary(),
        blocked:    false,
        reason:     None,
        attendance: Some(record),
      },
      // Isolated per-student failure; siblings still get their write.
      Err(e) => CheckinResult {
        student:    student.summary(),
        blocked:    true,
        reason:     Some(e.to_string()),
        attendance: None,
      },
    });
  }

  Ok(CheckinOutcome { schedule, results })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
