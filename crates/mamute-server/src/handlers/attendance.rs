//! Handler for `GET /api/attendance` — the admin attendance log.
//!
//! Read-only: attendance rows are written by the check-in resolver alone.

use axum::{
  Json,
  extract::{Query, State},
  http::HeaderMap,
};
use chrono::{DateTime, Utc};
use mamute_core::{
  attendance::{AttendanceQuery, AttendanceRecord},
  store::GymStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth, error::ApiError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub student_id:  Option<Uuid>,
  pub schedule_id: Option<Uuid>,
  pub from:        Option<DateTime<Utc>>,
  pub to:          Option<DateTime<Utc>>,
  pub limit:       Option<usize>,
}

/// `GET /api/attendance[?studentId=&scheduleId=&from=&to=&limit=]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let records = state
    .store
    .list_attendance(AttendanceQuery {
      student_id:  params.student_id,
      schedule_id: params.schedule_id,
      from:        params.from,
      to:          params.to,
      limit:       params.limit,
    })
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}
