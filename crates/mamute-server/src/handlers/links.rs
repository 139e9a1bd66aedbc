//! Handlers for `/api/links` — the mobile linking subsystem.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/links/verify` | Open identity probe: last name + number |
//! | `POST` | `/api/links` | Guardian linking; partial results on mismatch |
//! | `GET`  | `/api/links` | The caller's linked students |
//!
//! Name matching is case- and whitespace-insensitive throughout: the person
//! typing on a phone should not be punished for a stray space or caps lock.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use mamute_core::{
  access::AccessRole,
  store::GymStore,
  student::{Student, StudentSummary},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

fn names_match(expected: &str, provided: &str) -> bool {
  expected.trim().eq_ignore_ascii_case(provided.trim())
}

// ─── POST /api/links/verify ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
  pub last_name:      String,
  pub student_number: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedStudent {
  pub id:             uuid::Uuid,
  pub student_number: i64,
  pub full_name:      String,
}

/// Pre-registration identity probe: does this last name + number pair name a
/// real student? Open (the caller has no account yet), so it leaks nothing
/// beyond what the caller already typed.
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<VerifyRequest>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  if body.last_name.trim().is_empty() || body.student_number <= 0 {
    return Err(ApiError::MissingFields);
  }

  let student = state
    .store
    .find_students_by_numbers(vec![body.student_number])
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .next()
    .ok_or(ApiError::NotFound("STUDENT_NOT_FOUND"))?;

  let last_name = student.last_name.as_deref().unwrap_or("");
  if !names_match(last_name, &body.last_name) {
    return Err(ApiError::Forbidden("DETAILS_MISMATCH"));
  }

  Ok(Json(json!({
    "student": VerifiedStudent {
      id:             student.student_id,
      student_number: student.student_number,
      full_name:      student.full_name(),
    }
  })))
}

// ─── POST /api/links ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTarget {
  pub student_number: i64,
  pub student_name:   String,
}

/// Accepts either a batch under `students` or a single inline pair.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
  #[serde(default)]
  pub students:       Vec<LinkTarget>,
  pub student_number: Option<i64>,
  pub student_name:   Option<String>,
}

impl LinkRequest {
  fn targets(self) -> Vec<LinkTarget> {
    if !self.students.is_empty() {
      return self.students;
    }
    match (self.student_number, self.student_name) {
      (Some(student_number), Some(student_name)) => {
        vec![LinkTarget { student_number, student_name }]
      }
      _ => Vec::new(),
    }
  }
}

/// Link the caller's account to every target whose number and full name both
/// match. A target that doesn't match is reported under `missing` rather than
/// failing the batch; matched targets are linked regardless.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<LinkRequest>,
) -> Result<Response, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  let account = auth::authenticate_account(&headers, state.store.as_ref()).await?;

  let targets = body.targets();
  if targets.is_empty() {
    return Err(ApiError::MissingFields);
  }

  let numbers: Vec<i64> =
    targets.iter().map(|t| t.student_number).collect();
  let students = state
    .store
    .find_students_by_numbers(numbers)
    .await
    .map_err(ApiError::store)?;
  let by_number: std::collections::HashMap<i64, Student> = students
    .into_iter()
    .map(|s| (s.student_number, s))
    .collect();

  let mut linked: Vec<StudentSummary> = Vec::new();
  let mut missing: Vec<LinkTarget> = Vec::new();

  for target in targets {
    let matched = by_number
      .get(&target.student_number)
      .filter(|s| names_match(&s.full_name(), &target.student_name));
    let Some(student) = matched else {
      missing.push(target);
      continue;
    };

    state
      .store
      .upsert_access_link(
        account.account_id,
        student.student_id,
        AccessRole::Guardian,
      )
      .await
      .map_err(ApiError::store)?;
    linked.push(student.summary());
  }

  tracing::info!(
    account_id = %account.account_id,
    linked = linked.len(),
    missing = missing.len(),
    "access linking"
  );

  if !missing.is_empty() {
    return Ok((
      StatusCode::NOT_FOUND,
      Json(json!({
        "error":   "STUDENTS_NOT_FOUND",
        "missing": missing,
        "linked":  linked,
      })),
    )
      .into_response());
  }

  Ok(Json(json!({ "linked": linked })).into_response())
}

// ─── GET /api/links ──────────────────────────────────────────────────────

/// The students the caller's account may check in.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Vec<StudentSummary>>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  let account = auth::authenticate_account(&headers, state.store.as_ref()).await?;

  let links = state
    .store
    .list_access_links(account.account_id)
    .await
    .map_err(ApiError::store)?;

  let mut students = Vec::with_capacity(links.len());
  for link in links {
    if let Some(student) = state
      .store
      .get_student(link.student_id)
      .await
      .map_err(ApiError::store)?
    {
      students.push(student.summary());
    }
  }
  Ok(Json(students))
}
