//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"error": CODE}` with a stable machine-readable
//! code and a secondary human-readable `message`. Check-in failures carry
//! their own codes; `STUDENTS_NOT_FOUND` additionally reports the unknown
//! numbers under `missing`.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use mamute_core::checkin::CheckinError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Required fields absent or unusable. Renders as 400 `MISSING_FIELDS`.
  #[error("missing or malformed fields")]
  MissingFields,

  #[error("unauthorized")]
  Unauthorized,

  /// 403 with the given code, e.g. `DETAILS_MISMATCH`.
  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  /// 404 with the given code, e.g. `STUDENT_NOT_FOUND`.
  #[error("not found: {0}")]
  NotFound(&'static str),

  /// 409 with the given code, e.g. `ACCOUNT_EXISTS`.
  #[error("conflict: {0}")]
  Conflict(&'static str),

  #[error(transparent)]
  Checkin(#[from] CheckinError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    ApiError::Store(Box::new(e))
  }
}

fn checkin_status(e: &CheckinError) -> StatusCode {
  match e {
    CheckinError::MissingIdentification => StatusCode::BAD_REQUEST,
    CheckinError::Unauthorized => StatusCode::UNAUTHORIZED,
    CheckinError::LocationRequired | CheckinError::AccessDenied => {
      StatusCode::FORBIDDEN
    }
    CheckinError::StudentsNotFound { .. } | CheckinError::NoClassAvailable => {
      StatusCode::NOT_FOUND
    }
    CheckinError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::MissingFields => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "MISSING_FIELDS", "message": self.to_string() }),
      ),
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "UNAUTHORIZED" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"mamute\""),
        );
        return res;
      }
      ApiError::Forbidden(code) => (
        StatusCode::FORBIDDEN,
        json!({ "error": code, "message": self.to_string() }),
      ),
      ApiError::NotFound(code) => (
        StatusCode::NOT_FOUND,
        json!({ "error": code, "message": self.to_string() }),
      ),
      ApiError::Conflict(code) => (
        StatusCode::CONFLICT,
        json!({ "error": code, "message": self.to_string() }),
      ),
      ApiError::Checkin(e) => {
        let mut body = json!({ "error": e.code(), "message": e.to_string() });
        if let CheckinError::StudentsNotFound { missing } = e {
          body["missing"] = json!(missing);
        }
        (checkin_status(e), body)
      }
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "SERVER_ERROR", "message": e.to_string() }),
      ),
      ApiError::Internal(msg) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "SERVER_ERROR", "message": msg }),
      ),
    };
    (status, Json(body)).into_response()
  }
}
