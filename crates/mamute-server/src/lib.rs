//! HTTP server for Mamute — gym check-in and membership.
//!
//! Exposes a JSON REST API over any [`mamute_core::store::GymStore`]:
//!
//! | Method(s) | Path | Auth |
//! |-----------|------|------|
//! | `POST` | `/api/checkin` | admin (front desk) or account (mobile) |
//! | `POST` | `/api/register` | open |
//! | `POST` | `/api/links/verify` | open |
//! | `GET` `POST` | `/api/links` | account |
//! | `GET` `POST` | `/api/students` | admin |
//! | `GET` `PUT` `DELETE` | `/api/students/{id}` | admin |
//! | `GET` `POST` | `/api/schedules` | admin |
//! | `GET` `PUT` `DELETE` | `/api/schedules/{id}` | admin |
//! | `GET` | `/api/attendance` | admin |
//! | `GET` `PUT` | `/api/settings` | admin |
//! | `GET` | `/api/announcements` | admin or account |
//! | `POST` | `/api/announcements` | admin |

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use mamute_core::{clock::Clock, store::GymStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use auth::AdminCredentials;
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. The clock is injected so
/// tests can pin "now" and exercise the session window deterministically.
pub struct AppState<S: GymStore> {
  pub store: Arc<S>,
  pub admin: Arc<AdminCredentials>,
  pub clock: Arc<dyn Clock>,
}

impl<S: GymStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      admin: Arc::clone(&self.admin),
      clock: Arc::clone(&self.clock),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the API server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GymStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  use handlers::{
    announcements, attendance, checkin, links, register, schedules, settings,
    students,
  };

  Router::new()
    // Check-in
    .route("/api/checkin", post(checkin::handler::<S>))
    // Accounts and linking
    .route("/api/register", post(register::register::<S>))
    .route("/api/links/verify", post(links::verify::<S>))
    .route("/api/links", get(links::list::<S>).post(links::create::<S>))
    // Students
    .route(
      "/api/students",
      get(students::list::<S>).post(students::create::<S>),
    )
    .route(
      "/api/students/{id}",
      get(students::get_one::<S>)
        .put(students::update::<S>)
        .delete(students::delete::<S>),
    )
    // Schedules
    .route(
      "/api/schedules",
      get(schedules::list::<S>).post(schedules::create::<S>),
    )
    .route(
      "/api/schedules/{id}",
      get(schedules::get_one::<S>)
        .put(schedules::update::<S>)
        .delete(schedules::delete::<S>),
    )
    // Attendance log
    .route("/api/attendance", get(attendance::list::<S>))
    // Settings
    .route(
      "/api/settings",
      get(settings::get::<S>).put(settings::update::<S>),
    )
    // Announcements
    .route(
      "/api/announcements",
      get(announcements::list::<S>).post(announcements::create::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use chrono::{TimeZone, Utc};
  use mamute_core::clock::FixedClock;
  use mamute_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  /// In-memory store, admin `admin`/`secret`, clock pinned to
  /// 2026-06-17 22:10 UTC — Wednesday 18:10 in Toronto (EDT).
  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store: Arc::new(store),
      admin: Arc::new(AdminCredentials {
        username:      "admin".to_string(),
        password_hash: auth::hash_password("secret").unwrap(),
      }),
      clock: Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 6, 17, 22, 10, 0).unwrap(),
      )),
    }
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn admin_auth() -> String { basic("admin", "secret") }

  async fn request(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_student(state: &AppState<SqliteStore>, number: i64, last: &str) {
    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/students",
      Some(&admin_auth()),
      Some(json!({
        "studentNumber": number,
        "firstName": "Ana",
        "lastName": last,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  async fn create_wed_1800_class(state: &AppState<SqliteStore>) {
    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/schedules",
      Some(&admin_auth()),
      Some(json!({
        "classType": "bjj",
        "dayOfWeek": 3,
        "startTime": "18:00",
        "endTime": "19:00",
        "timezone": "America/Toronto",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  // ── Auth ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_request_gets_401_with_challenge() {
    let state = make_state().await;
    let mut builder = Request::builder().method("GET").uri("/api/students");
    builder = builder.header(header::ACCEPT, "application/json");
    let resp = router(state)
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp.headers().get(header::WWW_AUTHENTICATE).unwrap();
    assert!(challenge.to_str().unwrap().starts_with("Basic"));
  }

  #[tokio::test]
  async fn wrong_admin_password_is_rejected() {
    let state = make_state().await;
    let (status, _) = request(
      state,
      "GET",
      "/api/students",
      Some(&basic("admin", "wrong")),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Students CRUD ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn student_create_and_list() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;

    let (status, body) = request(
      state,
      "GET",
      "/api/students",
      Some(&admin_auth()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["studentNumber"], 1547);
  }

  #[tokio::test]
  async fn malformed_body_is_400_missing_fields() {
    let state = make_state().await;

    // Not JSON at all.
    let req = Request::builder()
      .method("POST")
      .uri("/api/students")
      .header(header::AUTHORIZATION, admin_auth())
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "MISSING_FIELDS");

    // Valid JSON, wrong field type.
    let (status, body) = request(
      state,
      "POST",
      "/api/students",
      Some(&admin_auth()),
      Some(json!({ "studentNumber": "not-a-number" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FIELDS");
  }

  #[tokio::test]
  async fn duplicate_student_number_is_conflict() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;

    let (status, body) = request(
      state,
      "POST",
      "/api/students",
      Some(&admin_auth()),
      Some(json!({ "studentNumber": 1547, "lastName": "Souza" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "STUDENT_NUMBER_TAKEN");
  }

  #[tokio::test]
  async fn unknown_student_id_is_404() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "GET",
      &format!("/api/students/{}", uuid::Uuid::new_v4()),
      Some(&admin_auth()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "STUDENT_NOT_FOUND");
  }

  // ── Check-in ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn frontdesk_barcode_checkin_succeeds() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_wed_1800_class(&state).await;

    let (status, body) = request(
      state,
      "POST",
      "/api/checkin",
      Some(&admin_auth()),
      Some(json!({ "barcode": "MMAA-1547", "source": "frontdesk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["schedule"]["startTime"], "18:00");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["blocked"], false);
    assert!(results[0]["attendance"].is_object());
  }

  #[tokio::test]
  async fn checkin_with_unknown_number_reports_missing() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_wed_1800_class(&state).await;

    let (status, body) = request(
      state,
      "POST",
      "/api/checkin",
      Some(&admin_auth()),
      Some(json!({ "studentNumbers": [1547, 9999], "source": "frontdesk" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "STUDENTS_NOT_FOUND");
    assert_eq!(body["missing"], json!([9999]));
  }

  #[tokio::test]
  async fn checkin_outside_window_is_404() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    // Right day, wrong time of day.
    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/schedules",
      Some(&admin_auth()),
      Some(json!({
        "classType": "bjj",
        "dayOfWeek": 3,
        "startTime": "10:00",
        "endTime": "11:00",
        "timezone": "America/Toronto",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
      state,
      "POST",
      "/api/checkin",
      Some(&admin_auth()),
      Some(json!({ "barcode": "MMAA-1547", "source": "frontdesk" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NO_CLASS_AVAILABLE");
  }

  #[tokio::test]
  async fn mobile_checkin_requires_verified_location() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_wed_1800_class(&state).await;

    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/register",
      None,
      Some(json!({
        "role": "student",
        "fullName": "Ana Silva",
        "email": "ana@example.com",
        "password": "hunter2",
        "studentNumbers": [1547],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
      state,
      "POST",
      "/api/checkin",
      Some(&basic("ana@example.com", "hunter2")),
      Some(json!({
        "studentNumbers": [1547],
        "source": "mobile",
        "locationVerified": false,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "LOCATION_REQUIRED");
  }

  #[tokio::test]
  async fn mobile_checkin_with_link_succeeds() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_wed_1800_class(&state).await;

    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/register",
      None,
      Some(json!({
        "role": "student",
        "fullName": "Ana Silva",
        "email": "ana@example.com",
        "password": "hunter2",
        "studentNumbers": [1547],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
      state,
      "POST",
      "/api/checkin",
      Some(&basic("ana@example.com", "hunter2")),
      Some(json!({
        "studentNumbers": [1547],
        "source": "mobile",
        "locationVerified": true,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["results"][0]["blocked"], false);
    assert_eq!(body["results"][0]["attendance"]["source"], "mobile");
  }

  #[tokio::test]
  async fn mobile_checkin_without_link_is_denied() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_student(&state, 2000, "Souza").await;
    create_wed_1800_class(&state).await;

    // Registered for 1547 only.
    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/register",
      None,
      Some(json!({
        "role": "student",
        "fullName": "Ana Silva",
        "email": "ana@example.com",
        "password": "hunter2",
        "studentNumbers": [1547],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
      state,
      "POST",
      "/api/checkin",
      Some(&basic("ana@example.com", "hunter2")),
      Some(json!({
        "studentNumbers": [2000],
        "source": "mobile",
        "locationVerified": true,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "ACCESS_DENIED");
  }

  // ── Registration and linking ────────────────────────────────────────────

  #[tokio::test]
  async fn duplicate_registration_is_conflict() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;

    let payload = json!({
      "role": "student",
      "fullName": "Ana Silva",
      "email": "ana@example.com",
      "password": "hunter2",
      "studentNumbers": [1547],
    });
    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/register",
      None,
      Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
      request(state, "POST", "/api/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ACCOUNT_EXISTS");
  }

  #[tokio::test]
  async fn verify_link_matches_case_insensitively() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;

    let (status, body) = request(
      state.clone(),
      "POST",
      "/api/links/verify",
      None,
      Some(json!({ "lastName": "  sIlVa ", "studentNumber": 1547 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["fullName"], "Ana Silva");

    let (status, body) = request(
      state,
      "POST",
      "/api/links/verify",
      None,
      Some(json!({ "lastName": "Souza", "studentNumber": 1547 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "DETAILS_MISMATCH");
  }

  #[tokio::test]
  async fn guardian_linking_reports_partial_matches() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_student(&state, 2000, "Souza").await;

    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/register",
      None,
      Some(json!({
        "role": "guardian",
        "fullName": "Rui Silva",
        "email": "rui@example.com",
        "password": "hunter2",
        "studentNumbers": [1547],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
      state.clone(),
      "POST",
      "/api/links",
      Some(&basic("rui@example.com", "hunter2")),
      Some(json!({
        "students": [
          { "studentNumber": 2000, "studentName": "Ana Souza" },
          { "studentNumber": 3000, "studentName": "Nobody" },
        ]
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "STUDENTS_NOT_FOUND");
    assert_eq!(body["linked"][0]["studentNumber"], 2000);
    assert_eq!(body["missing"][0]["studentNumber"], 3000);

    // Both the registration link and the guardian link are visible.
    let (status, body) = request(
      state,
      "GET",
      "/api/links",
      Some(&basic("rui@example.com", "hunter2")),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
  }

  // ── Settings ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn settings_default_and_round_trip() {
    let state = make_state().await;

    let (status, body) = request(
      state.clone(),
      "GET",
      "/api/settings",
      Some(&admin_auth()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "America/Toronto");
    assert_eq!(body["barcodePrefix"], "MMAA-");

    let (status, body) = request(
      state.clone(),
      "PUT",
      "/api/settings",
      Some(&admin_auth()),
      Some(json!({ "timezone": "Europe/Lisbon", "barcodePrefix": "GYM-" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "Europe/Lisbon");

    let (status, _) = request(
      state,
      "PUT",
      "/api/settings",
      Some(&admin_auth()),
      Some(json!({ "timezone": "Not/AZone", "barcodePrefix": "GYM-" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Attendance log ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn attendance_log_lists_checkins() {
    let state = make_state().await;
    create_student(&state, 1547, "Silva").await;
    create_wed_1800_class(&state).await;

    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/checkin",
      Some(&admin_auth()),
      Some(json!({ "barcode": "MMAA-1547", "source": "frontdesk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
      state,
      "GET",
      "/api/attendance",
      Some(&admin_auth()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["source"], "frontdesk");
  }
}
