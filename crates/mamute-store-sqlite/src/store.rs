//! [`SqliteStore`] — the SQLite implementation of [`GymStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use mamute_core::{
  access::{AccessLink, AccessRole},
  account::{Account, NewAccount},
  announcement::{Announcement, NewAnnouncement},
  attendance::{AttendanceQuery, AttendanceRecord, NewAttendance},
  schedule::{NewSchedule, SchedulePatch, ScheduleTemplate},
  settings::GymSettings,
  store::GymStore,
  student::{NewStudent, Student, StudentPatch},
};

use crate::{
  Error, Result,
  encode::{
    RawAccessLink, RawAccount, RawAnnouncement, RawAttendance, RawSchedule,
    RawStudent, encode_access_role, encode_account_role, encode_dt,
    encode_source, encode_standing, encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gym store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
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

const STUDENT_COLS: &str =
  "student_id, student_number, first_name, last_name, membership_standing, created_at";

const SCHEDULE_COLS: &str =
  "schedule_id, class_type, instructor_id, day_of_week, start_time, end_time, \
   timezone, is_active, created_at";

const ATTENDANCE_COLS: &str =
  "attendance_id, student_id, schedule_id, scanned_at, device_id, source, \
   location_verified";

fn read_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStudent> {
  Ok(RawStudent {
    student_id:          row.get(0)?,
    student_number:      row.get(1)?,
    first_name:          row.get(2)?,
    last_name:           row.get(3)?,
    membership_standing: row.get(4)?,
    created_at:          row.get(5)?,
  })
}

fn read_schedule(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSchedule> {
  Ok(RawSchedule {
    schedule_id:   row.get(0)?,
    class_type:    row.get(1)?,
    instructor_id: row.get(2)?,
    day_of_week:   row.get(3)?,
    start_time:    row.get(4)?,
    end_time:      row.get(5)?,
    timezone:      row.get(6)?,
    is_active:     row.get(7)?,
    created_at:    row.get(8)?,
  })
}

fn read_attendance(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAttendance> {
  Ok(RawAttendance {
    attendance_id:     row.get(0)?,
    student_id:        row.get(1)?,
    schedule_id:       row.get(2)?,
    scanned_at:        row.get(3)?,
    device_id:         row.get(4)?,
    source:            row.get(5)?,
    location_verified: row.get(6)?,
  })
}

// ─── GymStore impl ───────────────────────────────────────────────────────────

impl GymStore for SqliteStore {
  type Error = Error;

  // ── Students ──────────────────────────────────────────────────────────────

  async fn create_student(&self, input: NewStudent) -> Result<Student> {
    let number = input.student_number;
    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM students WHERE student_number = ?1",
              rusqlite::params![number],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    if taken {
      return Err(mamute_core::Error::StudentNumberTaken(number).into());
    }

    let student = Student {
      student_id:          Uuid::new_v4(),
      student_number:      input.student_number,
      first_name:          input.first_name,
      last_name:           input.last_name,
      membership_standing: input.membership_standing,
      created_at:          Utc::now(),
    };

    let id_str       = encode_uuid(student.student_id);
    let number       = student.student_number;
    let first        = student.first_name.clone();
    let last         = student.last_name.clone();
    let standing_str = encode_standing(student.membership_standing).to_owned();
    let at_str       = encode_dt(student.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (
             student_id, student_number, first_name, last_name,
             membership_standing, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, number, first, last, standing_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(student)
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLS} FROM students WHERE student_id = ?1"),
              rusqlite::params![id_str],
              read_student,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn find_students_by_numbers(&self, numbers: Vec<i64>) -> Result<Vec<Student>> {
    if numbers.is_empty() {
      return Ok(vec![]);
    }

    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; numbers.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLS} FROM students
           WHERE student_number IN ({placeholders})"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(numbers.iter()), read_student)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLS} FROM students ORDER BY student_number"
        ))?;
        let rows = stmt
          .query_map([], read_student)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> Result<Option<Student>> {
    let existing = match self.get_student(id).await? {
      Some(s) => s,
      None => return Ok(None),
    };

    let merged = Student {
      student_id:          existing.student_id,
      student_number:      existing.student_number,
      first_name:          patch.first_name.or(existing.first_name),
      last_name:           patch.last_name.or(existing.last_name),
      membership_standing: patch
        .membership_standing
        .unwrap_or(existing.membership_standing),
      created_at:          existing.created_at,
    };

    let id_str       = encode_uuid(id);
    let first        = merged.first_name.clone();
    let last         = merged.last_name.clone();
    let standing_str = encode_standing(merged.membership_standing).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE students
           SET first_name = ?2, last_name = ?3, membership_standing = ?4
           WHERE student_id = ?1",
          rusqlite::params![id_str, first, last, standing_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(merged))
  }

  async fn delete_student(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM student_access WHERE student_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(conn.execute(
          "DELETE FROM students WHERE student_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Access links ──────────────────────────────────────────────────────────

  async fn has_access(&self, account_id: Uuid, student_ids: Vec<Uuid>) -> Result<bool> {
    if student_ids.is_empty() {
      return Ok(true);
    }

    let expected = student_ids.len() as i64;
    let mut params: Vec<String> = vec![encode_uuid(account_id)];
    params.extend(student_ids.into_iter().map(encode_uuid));

    let count: i64 = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; params.len() - 1].join(", ");
        Ok(conn.query_row(
          &format!(
            "SELECT COUNT(DISTINCT student_id) FROM student_access
             WHERE account_id = ? AND student_id IN ({placeholders})"
          ),
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count == expected)
  }

  async fn upsert_access_link(
    &self,
    account_id: Uuid,
    student_id: Uuid,
    role: AccessRole,
  ) -> Result<AccessLink> {
    let account_str = encode_uuid(account_id);
    let student_str = encode_uuid(student_id);
    let role_str    = encode_access_role(role).to_owned();
    let at_str      = encode_dt(Utc::now());

    let raw: RawAccessLink = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO student_access (account_id, student_id, role, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (account_id, student_id) DO UPDATE SET role = excluded.role",
          rusqlite::params![account_str, student_str, role_str, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT account_id, student_id, role, created_at
           FROM student_access WHERE account_id = ?1 AND student_id = ?2",
          rusqlite::params![account_str, student_str],
          |row| {
            Ok(RawAccessLink {
              account_id: row.get(0)?,
              student_id: row.get(1)?,
              role:       row.get(2)?,
              created_at: row.get(3)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_link()
  }

  async fn list_access_links(&self, account_id: Uuid) -> Result<Vec<AccessLink>> {
    let account_str = encode_uuid(account_id);

    let raws: Vec<RawAccessLink> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT account_id, student_id, role, created_at
           FROM student_access WHERE account_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![account_str], |row| {
            Ok(RawAccessLink {
              account_id: row.get(0)?,
              student_id: row.get(1)?,
              role:       row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccessLink::into_link).collect()
  }

  // ── Schedule templates ────────────────────────────────────────────────────

  async fn create_schedule(&self, input: NewSchedule) -> Result<ScheduleTemplate> {
    let schedule = ScheduleTemplate {
      schedule_id:   Uuid::new_v4(),
      class_type:    input.class_type,
      instructor_id: input.instructor_id,
      day_of_week:   input.day_of_week,
      start_time:    input.start_time,
      end_time:      input.end_time,
      timezone:      input.timezone,
      active:        input.active,
      created_at:    Utc::now(),
    };

    let id_str         = encode_uuid(schedule.schedule_id);
    let class_type     = schedule.class_type.clone();
    let instructor_str = schedule.instructor_id.map(encode_uuid);
    let day            = schedule.day_of_week as i64;
    let start_str      = encode_time(schedule.start_time);
    let end_str        = encode_time(schedule.end_time);
    let tz             = schedule.timezone.clone();
    let active         = schedule.active;
    let at_str         = encode_dt(schedule.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO class_schedules (
             schedule_id, class_type, instructor_id, day_of_week,
             start_time, end_time, timezone, is_active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, class_type, instructor_str, day, start_str, end_str, tz,
            active, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(schedule)
  }

  async fn get_schedule(&self, id: Uuid) -> Result<Option<ScheduleTemplate>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSchedule> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SCHEDULE_COLS} FROM class_schedules WHERE schedule_id = ?1"
              ),
              rusqlite::params![id_str],
              read_schedule,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSchedule::into_schedule).transpose()
  }

  async fn find_active_schedules_by_day(
    &self,
    day_of_week: u8,
  ) -> Result<Vec<ScheduleTemplate>> {
    let day = day_of_week as i64;

    let raws: Vec<RawSchedule> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SCHEDULE_COLS} FROM class_schedules
           WHERE day_of_week = ?1 AND is_active = 1
           ORDER BY start_time"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![day], read_schedule)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSchedule::into_schedule).collect()
  }

  async fn list_schedules(
    &self,
    day_of_week: Option<u8>,
  ) -> Result<Vec<ScheduleTemplate>> {
    let day = day_of_week.map(|d| d as i64);

    let raws: Vec<RawSchedule> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(day) = day {
          let mut stmt = conn.prepare(&format!(
            "SELECT {SCHEDULE_COLS} FROM class_schedules
             WHERE day_of_week = ?1
             ORDER BY day_of_week, start_time"
          ))?;
          stmt
            .query_map(rusqlite::params![day], read_schedule)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {SCHEDULE_COLS} FROM class_schedules
             ORDER BY day_of_week, start_time"
          ))?;
          stmt
            .query_map([], read_schedule)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSchedule::into_schedule).collect()
  }

  async fn update_schedule(
    &self,
    id: Uuid,
    patch: SchedulePatch,
  ) -> Result<Option<ScheduleTemplate>> {
    let existing = match self.get_schedule(id).await? {
      Some(s) => s,
      None => return Ok(None),
    };

    let merged = ScheduleTemplate {
      schedule_id:   existing.schedule_id,
      class_type:    patch.class_type.unwrap_or(existing.class_type),
      instructor_id: patch.instructor_id.or(existing.instructor_id),
      day_of_week:   patch.day_of_week.unwrap_or(existing.day_of_week),
      start_time:    patch.start_time.unwrap_or(existing.start_time),
      end_time:      patch.end_time.unwrap_or(existing.end_time),
      timezone:      patch.timezone.unwrap_or(existing.timezone),
      active:        patch.active.unwrap_or(existing.active),
      created_at:    existing.created_at,
    };

    let id_str         = encode_uuid(id);
    let class_type     = merged.class_type.clone();
    let instructor_str = merged.instructor_id.map(encode_uuid);
    let day            = merged.day_of_week as i64;
    let start_str      = encode_time(merged.start_time);
    let end_str        = encode_time(merged.end_time);
    let tz             = merged.timezone.clone();
    let active         = merged.active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE class_schedules
           SET class_type = ?2, instructor_id = ?3, day_of_week = ?4,
               start_time = ?5, end_time = ?6, timezone = ?7, is_active = ?8
           WHERE schedule_id = ?1",
          rusqlite::params![
            id_str, class_type, instructor_str, day, start_str, end_str, tz,
            active,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(merged))
  }

  async fn delete_schedule(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM class_schedules WHERE schedule_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Attendance — append-only writes ───────────────────────────────────────

  async fn insert_attendance(&self, input: NewAttendance) -> Result<AttendanceRecord> {
    let record = AttendanceRecord {
      attendance_id:     Uuid::new_v4(),
      student_id:        input.student_id,
      schedule_id:       input.schedule_id,
      scanned_at:        input.scanned_at,
      device_id:         input.device_id,
      source:            input.source,
      location_verified: input.location_verified,
    };

    let id_str       = encode_uuid(record.attendance_id);
    let student_str  = encode_uuid(record.student_id);
    let schedule_str = record.schedule_id.map(encode_uuid);
    let at_str       = encode_dt(record.scanned_at);
    let device       = record.device_id.clone();
    let source_str   = encode_source(record.source).to_owned();
    let verified     = record.location_verified;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attendance (
             attendance_id, student_id, schedule_id, scanned_at,
             device_id, source, location_verified
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, student_str, schedule_str, at_str, device, source_str,
            verified,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
    let student_str  = query.student_id.map(encode_uuid);
    let schedule_str = query.schedule_id.map(encode_uuid);
    let from_str     = query.from.map(encode_dt);
    let to_str       = query.to.map(encode_dt);
    let limit_val    = query.limit.unwrap_or(500) as i64;

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        // Fixed placeholder numbers; unused ones are bound but never read.
        let mut conds: Vec<&'static str> = vec![];
        if student_str.is_some() {
          conds.push("student_id = ?1");
        }
        if schedule_str.is_some() {
          conds.push("schedule_id = ?2");
        }
        if from_str.is_some() {
          conds.push("scanned_at >= ?3");
        }
        if to_str.is_some() {
          conds.push("scanned_at <= ?4");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {ATTENDANCE_COLS} FROM attendance
           {where_clause}
           ORDER BY scanned_at DESC
           LIMIT ?5"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              student_str.as_deref(),
              schedule_str.as_deref(),
              from_str.as_deref(),
              to_str.as_deref(),
              limit_val,
            ],
            read_attendance,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_settings(&self) -> Result<GymSettings> {
    let row: Option<(String, String)> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT timezone, barcode_prefix FROM gym_settings WHERE id = 1",
              [],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(match row {
      Some((timezone, barcode_prefix)) => GymSettings { timezone, barcode_prefix },
      None => GymSettings::default(),
    })
  }

  async fn update_settings(&self, settings: GymSettings) -> Result<GymSettings> {
    let tz     = settings.timezone.clone();
    let prefix = settings.barcode_prefix.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO gym_settings (id, timezone, barcode_prefix)
           VALUES (1, ?1, ?2)
           ON CONFLICT (id) DO UPDATE
           SET timezone = excluded.timezone,
               barcode_prefix = excluded.barcode_prefix",
          rusqlite::params![tz, prefix],
        )?;
        Ok(())
      })
      .await?;

    Ok(settings)
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account(&self, input: NewAccount) -> Result<Account> {
    let username_check = input.username.clone();
    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM accounts WHERE username = ?1",
              rusqlite::params![username_check],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    if taken {
      return Err(mamute_core::Error::UsernameTaken(input.username).into());
    }

    let account = Account {
      account_id:    Uuid::new_v4(),
      username:      input.username,
      full_name:     input.full_name,
      role:          input.role,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str    = encode_uuid(account.account_id);
    let username  = account.username.clone();
    let full_name = account.full_name.clone();
    let role_str  = encode_account_role(account.role).to_owned();
    let hash      = account.password_hash.clone();
    let at_str    = encode_dt(account.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (
             account_id, username, full_name, role, password_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, username, full_name, role_str, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(account)
  }

  async fn find_account_by_username(&self, username: String) -> Result<Option<Account>> {
    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT account_id, username, full_name, role, password_hash, created_at
               FROM accounts WHERE username = ?1",
              rusqlite::params![username],
              |row| {
                Ok(RawAccount {
                  account_id:    row.get(0)?,
                  username:      row.get(1)?,
                  full_name:     row.get(2)?,
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

  // ── Announcements ─────────────────────────────────────────────────────────

  async fn create_announcement(&self, input: NewAnnouncement) -> Result<Announcement> {
    let announcement = Announcement {
      announcement_id: Uuid::new_v4(),
      title:           input.title,
      body:            input.body,
      audience:        input.audience,
      created_at:      Utc::now(),
      sent_at:         None,
    };

    let id_str   = encode_uuid(announcement.announcement_id);
    let title    = announcement.title.clone();
    let body     = announcement.body.clone();
    let audience = announcement.audience.clone();
    let at_str   = encode_dt(announcement.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO announcements (
             announcement_id, title, body, audience, created_at, sent_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
          rusqlite::params![id_str, title, body, audience, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(announcement)
  }

  async fn list_announcements(&self) -> Result<Vec<Announcement>> {
    let raws: Vec<RawAnnouncement> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT announcement_id, title, body, audience, created_at, sent_at
           FROM announcements ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAnnouncement {
              announcement_id: row.get(0)?,
              title:           row.get(1)?,
              body:            row.get(2)?,
              audience:        row.get(3)?,
              created_at:      row.get(4)?,
              sent_at:         row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAnnouncement::into_announcement)
      .collect()
  }
}
