//! Handler for `POST /api/checkin`.
//!
//! The transport layer resolves the caller before the resolver runs: front
//! desks authenticate with the admin credential, mobile apps with their
//! account. The resolved account id is injected into the request — never
//! trusted from the body.

use axum::{Json, extract::State, http::HeaderMap};
use mamute_core::{
  attendance::Source,
  checkin::{self, CheckinOutcome, CheckinRequest},
  store::GymStore,
};

use crate::{AppState, auth, error::ApiError, extract::JsonBody};

/// `POST /api/checkin` — body: `{"barcode": "...", "source": "frontdesk", ...}`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  JsonBody(mut body): JsonBody<CheckinRequest>,
) -> Result<Json<CheckinOutcome>, ApiError>
where
  S: GymStore + Clone + Send + Sync + 'static,
{
  match body.source {
    Source::Frontdesk => auth::verify_admin(&headers, &state.admin)?,
    Source::Mobile => {
      let account =
        auth::authenticate_account(&headers, state.store.as_ref()).await?;
      body.caller_account_id = Some(account.account_id);
    }
  }

  let outcome =
    checkin::resolve(state.store.as_ref(), state.clock.as_ref(), body).await?;

  tracing::info!(
    schedule = %outcome.schedule.schedule_id,
    students = outcome.results.len(),
    "check-in resolved"
  );
  Ok(Json(outcome))
}
