//! Handlers for `/api/students` — admin CRUD.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/students` | All students, ordered by number |
//! | `POST`   | `/api/students` | Body: [`NewStudent`]; 409 on duplicate number |
//! | `GET`    | `/api/students/:id` | 404 if not found |
//! | `PUT`    | `/api/students/:id` | Body: [`StudentPatch`] |
//! | `DELETE` | `/api/students/:id` | 204 on success |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use mamute_core::{
  store::GymStore,
  student::{NewStudent, Student, StudentPatch},
};
use uuid::Uuid;

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

/// `GET /api/students`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let students = state.store.list_students().await.map_err(ApiError::store)?;
  Ok(Json(students))
}

/// `POST /api/students`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<NewStudent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  if body.student_number <= 0 {
    return Err(ApiError::MissingFields);
  }

  let taken = state
    .store
    .find_students_by_numbers(vec![body.student_number])
    .await
    .map_err(ApiError::store)?;
  if !taken.is_empty() {
    return Err(ApiError::Conflict("STUDENT_NUMBER_TAKEN"));
  }

  let student = state
    .store
    .create_student(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(student)))
}

/// `GET /api/students/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let student = state
    .store
    .get_student(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("STUDENT_NOT_FOUND"))?;
  Ok(Json(student))
}

/// `PUT /api/students/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<StudentPatch>,
) -> Result<Json<Student>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let student = state
    .store
    .update_student(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("STUDENT_NOT_FOUND"))?;
  Ok(Json(student))
}

/// `DELETE /api/students/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let deleted = state
    .store
    .delete_student(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound("STUDENT_NOT_FOUND"));
  }
  Ok(StatusCode::NO_CONTENT)
}
