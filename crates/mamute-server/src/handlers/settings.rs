//! Handlers for `/api/settings` — the single gym configuration row.

use axum::{Json, extract::State, http::HeaderMap};
use mamute_core::{settings::GymSettings, store::GymStore};

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

/// `GET /api/settings`
pub async fn get<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<GymSettings>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  let settings =
    state.store.get_settings().await.map_err(ApiError::store)?;
  Ok(Json(settings))
}

/// `PUT /api/settings`
///
/// The timezone must be a known IANA identifier; a typo here would silently
/// shift every session window, so it is rejected up front.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  JsonBody(body): JsonBody<GymSettings>,
) -> Result<Json<GymSettings>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  auth::verify_admin(&headers, &state.admin)?;
  if body.timezone.parse::<chrono_tz::Tz>().is_err() {
    return Err(ApiError::MissingFields);
  }
  let settings = state
    .store
    .update_settings(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(timezone = %settings.timezone, "settings updated");
  Ok(Json(settings))
}
