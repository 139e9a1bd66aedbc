//! HTTP Basic-auth verification.
//!
//! Two credential sources: the configured admin credential (front desk and
//! admin consoles) and the `accounts` table (mobile apps). Both store argon2
//! PHC strings; plaintext passwords exist only in transit.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::http::HeaderMap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use mamute_core::{account::Account, store::GymStore};
use rand_core::OsRng;

use crate::error::ApiError;

/// The single admin credential, read from `config.toml`.
#[derive(Clone)]
pub struct AdminCredentials {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Pull `(username, password)` out of a `Basic` Authorization header.
fn decode_basic(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds =
    String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((username.to_owned(), password.to_owned()))
}

fn verify_password(hash: &str, password: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Require the configured admin credential.
pub fn verify_admin(
  headers: &HeaderMap,
  admin: &AdminCredentials,
) -> Result<(), ApiError> {
  let (username, password) = decode_basic(headers)?;
  if username != admin.username
    || !verify_password(&admin.password_hash, &password)
  {
    return Err(ApiError::Unauthorized);
  }
  Ok(())
}

/// Resolve the caller to a mobile account.
pub async fn authenticate_account<S: GymStore>(
  headers: &HeaderMap,
  store: &S,
) -> Result<Account, ApiError> {
  let (username, password) = decode_basic(headers)?;
  let account = store
    .find_account_by_username(username)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&account.password_hash, &password) {
    return Err(ApiError::Unauthorized);
  }
  Ok(account)
}

/// Accept either credential kind — used by endpoints every signed-in user
/// may read.
pub async fn verify_any<S: GymStore>(
  headers: &HeaderMap,
  admin: &AdminCredentials,
  store: &S,
) -> Result<(), ApiError> {
  if verify_admin(headers, admin).is_ok() {
    return Ok(());
  }
  authenticate_account(headers, store).await.map(|_| ())
}

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}
