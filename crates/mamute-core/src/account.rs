//! Mobile accounts — the stand-in for the managed auth provider.
//!
//! Only the "resolve credential to account id" capability the check-in
//! resolver needs; no sessions, no tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who registered the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
  Student,
  Guardian,
}

/// An authenticated mobile identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  pub account_id: Uuid,
  /// Email address; unique.
  pub username:   String,
  pub full_name:  String,
  pub role:       AccountRole,
  /// Argon2 PHC string. Never serialised onto the wire.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

/// Input for creating an account. The caller hashes the password; the store
/// assigns the UUID and timestamp.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub username:      String,
  pub full_name:     String,
  pub role:          AccountRole,
  pub password_hash: String,
}
