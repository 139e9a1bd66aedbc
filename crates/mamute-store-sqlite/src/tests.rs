//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveTime, Utc};
use mamute_core::{
  access::AccessRole,
  account::{AccountRole, NewAccount},
  announcement::NewAnnouncement,
  attendance::{AttendanceQuery, NewAttendance, Source},
  schedule::{NewSchedule, SchedulePatch},
  settings::GymSettings,
  store::GymStore,
  student::{NewStudent, Standing, StudentPatch},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_student(number: i64) -> NewStudent {
  NewStudent {
    student_number:      number,
    first_name:          Some("Ana".into()),
    last_name:           Some("Silva".into()),
    membership_standing: Standing::Active,
  }
}

fn new_schedule(day: u8, start: &str) -> NewSchedule {
  let start_time = NaiveTime::parse_from_str(start, "%H:%M").unwrap();
  NewSchedule {
    class_type:    "bjj".into(),
    instructor_id: None,
    day_of_week:   day,
    start_time,
    end_time:      start_time + Duration::hours(1),
    timezone:      "America/Toronto".into(),
    active:        true,
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_student() {
  let s = store().await;

  let student = s.create_student(new_student(1547)).await.unwrap();
  assert_eq!(student.student_number, 1547);

  let fetched = s.get_student(student.student_id).await.unwrap().unwrap();
  assert_eq!(fetched.student_id, student.student_id);
  assert_eq!(fetched.full_name(), "Ana Silva");
  assert_eq!(fetched.membership_standing, Standing::Active);
}

#[tokio::test]
async fn get_student_missing_returns_none() {
  let s = store().await;
  assert!(s.get_student(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_student_number_is_rejected() {
  let s = store().await;
  s.create_student(new_student(1547)).await.unwrap();

  let err = s.create_student(new_student(1547)).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(mamute_core::Error::StudentNumberTaken(1547))
  ));
}

#[tokio::test]
async fn find_students_by_numbers_returns_only_matches() {
  let s = store().await;
  s.create_student(new_student(100)).await.unwrap();
  s.create_student(new_student(200)).await.unwrap();
  s.create_student(new_student(300)).await.unwrap();

  let found = s.find_students_by_numbers(vec![100, 300, 999]).await.unwrap();
  let mut numbers: Vec<i64> = found.iter().map(|s| s.student_number).collect();
  numbers.sort_unstable();
  assert_eq!(numbers, vec![100, 300]);
}

#[tokio::test]
async fn update_student_patches_standing_and_keeps_number() {
  let s = store().await;
  let student = s.create_student(new_student(100)).await.unwrap();

  let updated = s
    .update_student(
      student.student_id,
      StudentPatch {
        membership_standing: Some(Standing::Overdue),
        ..Default::default()
      },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.membership_standing, Standing::Overdue);
  assert_eq!(updated.student_number, 100);

  let fetched = s.get_student(student.student_id).await.unwrap().unwrap();
  assert_eq!(fetched.membership_standing, Standing::Overdue);
  assert_eq!(fetched.full_name(), "Ana Silva");
}

#[tokio::test]
async fn update_missing_student_returns_none() {
  let s = store().await;
  let result = s
    .update_student(Uuid::new_v4(), StudentPatch::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_student_removes_row_and_links() {
  let s = store().await;
  let student = s.create_student(new_student(100)).await.unwrap();
  let account = Uuid::new_v4();
  s.upsert_access_link(account, student.student_id, AccessRole::Guardian)
    .await
    .unwrap();

  assert!(s.delete_student(student.student_id).await.unwrap());
  assert!(s.get_student(student.student_id).await.unwrap().is_none());
  assert!(s.list_access_links(account).await.unwrap().is_empty());

  // Second delete is a no-op.
  assert!(!s.delete_student(student.student_id).await.unwrap());
}

// ─── Access links ────────────────────────────────────────────────────────────

#[tokio::test]
async fn has_access_requires_every_student() {
  let s = store().await;
  let a = s.create_student(new_student(100)).await.unwrap();
  let b = s.create_student(new_student(200)).await.unwrap();
  let account = Uuid::new_v4();
  s.upsert_access_link(account, a.student_id, AccessRole::Self_)
    .await
    .unwrap();

  assert!(s.has_access(account, vec![a.student_id]).await.unwrap());
  assert!(
    !s.has_access(account, vec![a.student_id, b.student_id])
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn upsert_access_link_is_idempotent() {
  let s = store().await;
  let student = s.create_student(new_student(100)).await.unwrap();
  let account = Uuid::new_v4();

  s.upsert_access_link(account, student.student_id, AccessRole::Self_)
    .await
    .unwrap();
  let link = s
    .upsert_access_link(account, student.student_id, AccessRole::Guardian)
    .await
    .unwrap();

  assert_eq!(link.role, AccessRole::Guardian);
  assert_eq!(s.list_access_links(account).await.unwrap().len(), 1);
}

// ─── Schedules ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_schedule_round_trips_times() {
  let s = store().await;
  let schedule = s.create_schedule(new_schedule(3, "18:00")).await.unwrap();

  let fetched = s.get_schedule(schedule.schedule_id).await.unwrap().unwrap();
  assert_eq!(fetched.start_minutes(), 18 * 60);
  assert_eq!(fetched.day_of_week, 3);
  assert_eq!(fetched.timezone, "America/Toronto");
  assert!(fetched.active);
}

#[tokio::test]
async fn find_active_schedules_filters_day_and_flag() {
  let s = store().await;
  s.create_schedule(new_schedule(3, "18:00")).await.unwrap();
  s.create_schedule(new_schedule(4, "18:00")).await.unwrap();
  let disabled = s.create_schedule(new_schedule(3, "19:00")).await.unwrap();
  s.update_schedule(
    disabled.schedule_id,
    SchedulePatch { active: Some(false), ..Default::default() },
  )
  .await
  .unwrap();

  let found = s.find_active_schedules_by_day(3).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].start_minutes(), 18 * 60);
}

#[tokio::test]
async fn update_schedule_patches_start_time() {
  let s = store().await;
  let schedule = s.create_schedule(new_schedule(3, "18:00")).await.unwrap();

  let updated = s
    .update_schedule(
      schedule.schedule_id,
      SchedulePatch {
        start_time: Some(NaiveTime::parse_from_str("19:30", "%H:%M").unwrap()),
        ..Default::default()
      },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.start_minutes(), 19 * 60 + 30);

  let fetched = s.get_schedule(schedule.schedule_id).await.unwrap().unwrap();
  assert_eq!(fetched.start_minutes(), 19 * 60 + 30);
}

#[tokio::test]
async fn delete_schedule_removes_row() {
  let s = store().await;
  let schedule = s.create_schedule(new_schedule(3, "18:00")).await.unwrap();
  assert!(s.delete_schedule(schedule.schedule_id).await.unwrap());
  assert!(s.get_schedule(schedule.schedule_id).await.unwrap().is_none());
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_attendance() {
  let s = store().await;
  let student = s.create_student(new_student(100)).await.unwrap();
  let schedule = s.create_schedule(new_schedule(3, "18:00")).await.unwrap();

  let record = s
    .insert_attendance(NewAttendance {
      student_id:        student.student_id,
      schedule_id:       Some(schedule.schedule_id),
      scanned_at:        Utc::now(),
      device_id:         Some("desk-1".into()),
      source:            Source::Frontdesk,
      location_verified: false,
    })
    .await
    .unwrap();

  let all = s.list_attendance(AttendanceQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].attendance_id, record.attendance_id);
  assert_eq!(all[0].source, Source::Frontdesk);
  assert_eq!(all[0].device_id.as_deref(), Some("desk-1"));
}

#[tokio::test]
async fn list_attendance_filters_by_student_and_window() {
  let s = store().await;
  let a = s.create_student(new_student(100)).await.unwrap();
  let b = s.create_student(new_student(200)).await.unwrap();
  let now = Utc::now();

  for (student, at) in [
    (&a, now - Duration::days(2)),
    (&a, now),
    (&b, now),
  ] {
    s.insert_attendance(NewAttendance {
      student_id:        student.student_id,
      schedule_id:       None,
      scanned_at:        at,
      device_id:         None,
      source:            Source::Mobile,
      location_verified: true,
    })
    .await
    .unwrap();
  }

  let recent_for_a = s
    .list_attendance(AttendanceQuery {
      student_id: Some(a.student_id),
      from:       Some(now - Duration::days(1)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(recent_for_a.len(), 1);
  assert_eq!(recent_for_a[0].student_id, a.student_id);
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_default_until_written() {
  let s = store().await;

  let settings = s.get_settings().await.unwrap();
  assert_eq!(settings.timezone, "America/Toronto");
  assert_eq!(settings.barcode_prefix, "MMAA-");

  s.update_settings(GymSettings {
    timezone:       "Europe/Lisbon".into(),
    barcode_prefix: "GYM-".into(),
  })
  .await
  .unwrap();

  let settings = s.get_settings().await.unwrap();
  assert_eq!(settings.timezone, "Europe/Lisbon");
  assert_eq!(settings.barcode_prefix, "GYM-");
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_account() {
  let s = store().await;
  let account = s
    .create_account(NewAccount {
      username:      "ana@example.com".into(),
      full_name:     "Ana Silva".into(),
      role:          AccountRole::Guardian,
      password_hash: "$argon2id$stub".into(),
    })
    .await
    .unwrap();

  let found = s
    .find_account_by_username("ana@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.account_id, account.account_id);
  assert_eq!(found.role, AccountRole::Guardian);

  assert!(
    s.find_account_by_username("nobody@example.com".into())
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  let input = NewAccount {
    username:      "ana@example.com".into(),
    full_name:     "Ana Silva".into(),
    role:          AccountRole::Student,
    password_hash: "$argon2id$stub".into(),
  };
  s.create_account(input.clone()).await.unwrap();

  let err = s.create_account(input).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(mamute_core::Error::UsernameTaken(ref u))
      if u == "ana@example.com"
  ));
}

// ─── Announcements ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_announcements() {
  let s = store().await;
  s.create_announcement(NewAnnouncement {
    title:    "Holiday hours".into(),
    body:     "Closed Monday.".into(),
    audience: None,
  })
  .await
  .unwrap();

  let all = s.list_announcements().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].title, "Holiday hours");
  assert!(all[0].sent_at.is_none());
}
