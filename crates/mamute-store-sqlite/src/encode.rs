//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Wall-clock times are stored
//! as `"HH:MM"`. Enumerations are stored by their lowercase wire name. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveTime, Utc};
use mamute_core::{
  access::{AccessLink, AccessRole},
  account::{Account, AccountRole},
  announcement::Announcement,
  attendance::{AttendanceRecord, Source},
  schedule::{ScheduleTemplate, wall_time},
  student::{Standing, Student},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_uuid_opt(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_time(t: NaiveTime) -> String { wall_time::format(t) }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  wall_time::parse(s).map_err(|e| Error::Decode(e.to_string()))
}

// ─── Standing ────────────────────────────────────────────────────────────────

pub fn encode_standing(s: Standing) -> &'static str {
  match s {
    Standing::Active => "active",
    Standing::Inactive => "inactive",
    Standing::Overdue => "overdue",
  }
}

pub fn decode_standing(s: &str) -> Result<Standing> {
  match s {
    "active" => Ok(Standing::Active),
    "inactive" => Ok(Standing::Inactive),
    "overdue" => Ok(Standing::Overdue),
    other => Err(Error::Decode(format!("unknown standing: {other:?}"))),
  }
}

// ─── Source ──────────────────────────────────────────────────────────────────

pub fn encode_source(s: Source) -> &'static str {
  match s {
    Source::Frontdesk => "frontdesk",
    Source::Mobile => "mobile",
  }
}

pub fn decode_source(s: &str) -> Result<Source> {
  match s {
    "frontdesk" => Ok(Source::Frontdesk),
    "mobile" => Ok(Source::Mobile),
    other => Err(Error::Decode(format!("unknown source: {other:?}"))),
  }
}

// ─── AccessRole ──────────────────────────────────────────────────────────────

pub fn encode_access_role(r: AccessRole) -> &'static str {
  match r {
    AccessRole::Self_ => "self",
    AccessRole::Guardian => "guardian",
  }
}

pub fn decode_access_role(s: &str) -> Result<AccessRole> {
  match s {
    "self" => Ok(AccessRole::Self_),
    "guardian" => Ok(AccessRole::Guardian),
    other => Err(Error::Decode(format!("unknown access role: {other:?}"))),
  }
}

// ─── AccountRole ─────────────────────────────────────────────────────────────

pub fn encode_account_role(r: AccountRole) -> &'static str {
  match r {
    AccountRole::Student => "student",
    AccountRole::Guardian => "guardian",
  }
}

pub fn decode_account_role(s: &str) -> Result<AccountRole> {
  match s {
    "student" => Ok(AccountRole::Student),
    "guardian" => Ok(AccountRole::Guardian),
    other => Err(Error::Decode(format!("unknown account role: {other:?}"))),
  }
}

// ─── Raw row structs ─────────────────────────────────────────────────────────
//
// Plain-string row shapes collected inside `conn.call` closures, decoded into
// domain types on the async side where `?` can surface `Error`.

pub struct RawStudent {
  pub student_id:          String,
  pub student_number:      i64,
  pub first_name:          Option<String>,
  pub last_name:           Option<String>,
  pub membership_standing: String,
  pub created_at:          String,
}

impl RawStudent {
  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id:          decode_uuid(&self.student_id)?,
      student_number:      self.student_number,
      first_name:          self.first_name,
      last_name:           self.last_name,
      membership_standing: decode_standing(&self.membership_standing)?,
      created_at:          decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSchedule {
  pub schedule_id:   String,
  pub class_type:    String,
  pub instructor_id: Option<String>,
  pub day_of_week:   i64,
  pub start_time:    String,
  pub end_time:      String,
  pub timezone:      String,
  pub is_active:     bool,
  pub created_at:    String,
}

impl RawSchedule {
  pub fn into_schedule(self) -> Result<ScheduleTemplate> {
    Ok(ScheduleTemplate {
      schedule_id:   decode_uuid(&self.schedule_id)?,
      class_type:    self.class_type,
      instructor_id: decode_uuid_opt(self.instructor_id)?,
      day_of_week:   self.day_of_week as u8,
      start_time:    decode_time(&self.start_time)?,
      end_time:      decode_time(&self.end_time)?,
      timezone:      self.timezone,
      active:        self.is_active,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAccessLink {
  pub account_id: String,
  pub student_id: String,
  pub role:       String,
  pub created_at: String,
}

impl RawAccessLink {
  pub fn into_link(self) -> Result<AccessLink> {
    Ok(AccessLink {
      account_id: decode_uuid(&self.account_id)?,
      student_id: decode_uuid(&self.student_id)?,
      role:       decode_access_role(&self.role)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAttendance {
  pub attendance_id:     String,
  pub student_id:        String,
  pub schedule_id:       Option<String>,
  pub scanned_at:        String,
  pub device_id:         Option<String>,
  pub source:            String,
  pub location_verified: bool,
}

impl RawAttendance {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      attendance_id:     decode_uuid(&self.attendance_id)?,
      student_id:        decode_uuid(&self.student_id)?,
      schedule_id:       decode_uuid_opt(self.schedule_id)?,
      scanned_at:        decode_dt(&self.scanned_at)?,
      device_id:         self.device_id,
      source:            decode_source(&self.source)?,
      location_verified: self.location_verified,
    })
  }
}

pub struct RawAccount {
  pub account_id:    String,
  pub username:      String,
  pub full_name:     String,
  pub role:          String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:    decode_uuid(&self.account_id)?,
      username:      self.username,
      full_name:     self.full_name,
      role:          decode_account_role(&self.role)?,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAnnouncement {
  pub announcement_id: String,
  pub title:           String,
  pub body:            String,
  pub audience:        Option<String>,
  pub created_at:      String,
  pub sent_at:         Option<String>,
}

impl RawAnnouncement {
  pub fn into_announcement(self) -> Result<Announcement> {
    Ok(Announcement {
      announcement_id: decode_uuid(&self.announcement_id)?,
      title:           self.title,
      body:            self.body,
      audience:        self.audience,
      created_at:      decode_dt(&self.created_at)?,
      sent_at:         self.sent_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
