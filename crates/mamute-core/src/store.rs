//! The `GymStore` trait — the persistence seam of the system.
//!
//! The trait is implemented by storage backends (e.g. `mamute-store-sqlite`)
//! and by in-memory fakes in tests. Higher layers (`mamute-server`, the
//! check-in resolver) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  access::{AccessLink, AccessRole},
  account::{Account, NewAccount},
  announcement::{Announcement, NewAnnouncement},
  attendance::{AttendanceQuery, AttendanceRecord, NewAttendance},
  schedule::{NewSchedule, SchedulePatch, ScheduleTemplate},
  settings::GymSettings,
  student::{NewStudent, Student, StudentPatch},
};

/// Abstraction over the gym's persistent state.
///
/// Attendance writes are append-only: no method updates or deletes a
/// recorded check-in. All methods return `Send` futures so the trait can be
/// used in multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GymStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Students ──────────────────────────────────────────────────────────

  fn create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Retrieve a student by UUID. Returns `None` if not found.
  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Look up all students whose number is in `numbers`. Unknown numbers are
  /// simply absent from the result; the caller decides whether that is an
  /// error.
  fn find_students_by_numbers(
    &self,
    numbers: Vec<i64>,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns `None` if the student does not exist.
  fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Returns `true` if a row was deleted.
  fn delete_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Access links ──────────────────────────────────────────────────────

  /// All-or-nothing membership check: `true` iff `account_id` holds a link
  /// to every id in `student_ids`.
  fn has_access(
    &self,
    account_id: Uuid,
    student_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Create or refresh a link; idempotent on `(account_id, student_id)`.
  fn upsert_access_link(
    &self,
    account_id: Uuid,
    student_id: Uuid,
    role: AccessRole,
  ) -> impl Future<Output = Result<AccessLink, Self::Error>> + Send + '_;

  fn list_access_links(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AccessLink>, Self::Error>> + Send + '_;

  // ── Schedule templates ────────────────────────────────────────────────

  fn create_schedule(
    &self,
    input: NewSchedule,
  ) -> impl Future<Output = Result<ScheduleTemplate, Self::Error>> + Send + '_;

  fn get_schedule(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ScheduleTemplate>, Self::Error>> + Send + '_;

  /// Active templates for one weekday (0 = Sunday). The resolver's only
  /// schedule read.
  fn find_active_schedules_by_day(
    &self,
    day_of_week: u8,
  ) -> impl Future<Output = Result<Vec<ScheduleTemplate>, Self::Error>> + Send + '_;

  /// All templates, optionally restricted to one weekday.
  fn list_schedules(
    &self,
    day_of_week: Option<u8>,
  ) -> impl Future<Output = Result<Vec<ScheduleTemplate>, Self::Error>> + Send + '_;

  fn update_schedule(
    &self,
    id: Uuid,
    patch: SchedulePatch,
  ) -> impl Future<Output = Result<Option<ScheduleTemplate>, Self::Error>> + Send + '_;

  fn delete_schedule(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Attendance — append-only writes ───────────────────────────────────

  /// Record one check-in and return the persisted record.
  fn insert_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  fn list_attendance(
    &self,
    query: AttendanceQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// The gym settings row; defaults when none has been written yet.
  fn get_settings(
    &self,
  ) -> impl Future<Output = Result<GymSettings, Self::Error>> + Send + '_;

  fn update_settings(
    &self,
    settings: GymSettings,
  ) -> impl Future<Output = Result<GymSettings, Self::Error>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  fn find_account_by_username(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  // ── Announcements ─────────────────────────────────────────────────────

  fn create_announcement(
    &self,
    input: NewAnnouncement,
  ) -> impl Future<Output = Result<Announcement, Self::Error>> + Send + '_;

  fn list_announcements(
    &self,
  ) -> impl Future<Output = Result<Vec<Announcement>, Self::Error>> + Send + '_;
}
