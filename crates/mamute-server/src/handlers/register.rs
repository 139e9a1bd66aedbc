//! Handler for `POST /api/register` — mobile account sign-up.
//!
//! Open endpoint: the caller has no credential yet. Creates an account row
//! with an argon2-hashed password and links it to every matched student.
//! Student lookup happens before account creation so a bad student number
//! never leaves an orphaned account behind.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use mamute_core::{
  access::AccessRole,
  account::{AccountRole, NewAccount},
  store::GymStore,
  student::StudentSummary,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
  pub role:            AccountRole,
  pub full_name:       String,
  pub email:           String,
  pub password:        String,
  pub student_numbers: Vec<i64>,
}

/// `POST /api/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  if body.full_name.trim().is_empty()
    || body.email.trim().is_empty()
    || body.password.is_empty()
    || body.student_numbers.is_empty()
  {
    return Err(ApiError::MissingFields);
  }

  let username = body.email.trim().to_lowercase();
  let existing = state
    .store
    .find_account_by_username(username.clone())
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::Conflict("ACCOUNT_EXISTS"));
  }

  let students = state
    .store
    .find_students_by_numbers(body.student_numbers)
    .await
    .map_err(ApiError::store)?;
  if students.is_empty() {
    return Err(ApiError::NotFound("STUDENT_NOT_FOUND"));
  }

  let password_hash = auth::hash_password(&body.password)?;
  let account = state
    .store
    .create_account(NewAccount {
      username,
      full_name: body.full_name.trim().to_owned(),
      role: body.role,
      password_hash,
    })
    .await
    .map_err(ApiError::store)?;

  let link_role = match body.role {
    AccountRole::Student => AccessRole::Self_,
    AccountRole::Guardian => AccessRole::Guardian,
  };
  let mut linked: Vec<StudentSummary> = Vec::with_capacity(students.len());
  for student in &students {
    state
      .store
      .upsert_access_link(account.account_id, student.student_id, link_role)
      .await
      .map_err(ApiError::store)?;
    linked.push(student.summary());
  }

  tracing::info!(
    account_id = %account.account_id,
    linked = linked.len(),
    "account registered"
  );

  Ok((
    StatusCode::CREATED,
    Json(json!({ "account": account, "linked": linked })),
  ))
}
