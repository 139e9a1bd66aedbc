//! Handlers for `/api/announcements`.
//!
//! Announcements are stored and listed; push delivery happens out-of-band.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use mamute_core::{
  announcement::{Announcement, NewAnnouncement},
  store::GymStore,
};

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

/// `GET /api/announcements` — any signed-in caller.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Announcement>>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_any(&headers, &state.admin, state.store.as_ref()).await?;
  let announcements = state
    .store
    .list_announcements()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(announcements))
}

/// `POST /api/announcements` — admin only.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<NewAnnouncement>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  if body.title.trim().is_empty() || body.body.trim().is_empty() {
    return Err(ApiError::MissingFields);
  }
  let announcement = state
    .store
    .create_announcement(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(announcement)))
}
