//! Request-body extraction.
//!
//! axum's `Json` rejects unparseable or type-mismatched bodies with its own
//! 422 responses; the API contract is 400 `MISSING_FIELDS` for every
//! malformed body. [`JsonBody`] wraps `Json` and maps the rejection.

use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` with rejections rendered as [`ApiError::MissingFields`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
    let axum::Json(value) = axum::Json::<T>::from_request(req, state)
      .await
      .map_err(|_| ApiError::MissingFields)?;
    Ok(Self(value))
  }
}
