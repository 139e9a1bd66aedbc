//! Access links — which accounts may check in which students.
//!
//! A link grants a mobile account (the student themself, or a guardian)
//! permission to check a student in from the app. Front-desk requests bypass
//! this gate entirely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The relationship between the account and the student it may check in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRole {
  /// The account belongs to the student.
  #[serde(rename = "self")]
  Self_,
  Guardian,
}

/// A grant from the linking subsystem; read-only for the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLink {
  pub account_id: Uuid,
  pub student_id: Uuid,
  pub role:       AccessRole,
  pub created_at: DateTime<Utc>,
}
