//! Handlers for `/api/schedules` — admin CRUD over weekly class templates.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/schedules` | Optional `?day=0..6` |
//! | `POST`   | `/api/schedules` | Body: [`NewSchedule`] |
//! | `GET`    | `/api/schedules/:id` | 404 if not found |
//! | `PUT`    | `/api/schedules/:id` | Body: [`SchedulePatch`] |
//! | `DELETE` | `/api/schedules/:id` | 204 on success |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use mamute_core::{
  schedule::{NewSchedule, SchedulePatch, ScheduleTemplate},
  store::GymStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub day: Option<u8>,
}

/// `GET /api/schedules[?day=<0..6>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ScheduleTemplate>>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  if params.day.is_some_and(|d| d > 6) {
    return Err(ApiError::MissingFields);
  }
  let schedules = state
    .store
    .list_schedules(params.day)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(schedules))
}

/// `POST /api/schedules`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<NewSchedule>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  if body.day_of_week > 6 || body.class_type.trim().is_empty() {
    return Err(ApiError::MissingFields);
  }
  let schedule = state
    .store
    .create_schedule(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(schedule)))
}

/// `GET /api/schedules/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<ScheduleTemplate>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let schedule = state
    .store
    .get_schedule(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("SCHEDULE_NOT_FOUND"))?;
  Ok(Json(schedule))
}

/// `PUT /api/schedules/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<SchedulePatch>,
) -> Result<Json<ScheduleTemplate>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  if body.day_of_week.is_some_and(|d| d > 6) {
    return Err(ApiError::MissingFields);
  }
  let schedule = state
    .store
    .update_schedule(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("SCHEDULE_NOT_FOUND"))?;
  Ok(Json(schedule))
}

/// `DELETE /api/schedules/:id`
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
    .delete_schedule(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound("SCHEDULE_NOT_FOUND"));
  }
  Ok(StatusCode::NO_CONTENT)
}
