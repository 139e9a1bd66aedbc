//! Announcements broadcast to members. Stored and listed here; delivery to
//! the push relay is an external concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
  pub announcement_id: Uuid,
  pub title:           String,
  pub body:            String,
  /// Free-text audience tag, e.g. a class type or `"all"`.
  pub audience:        Option<String>,
  pub created_at:      DateTime<Utc>,
  /// Set by the delivery pipeline once the relay accepted the broadcast.
  pub sent_at:         Option<DateTime<Utc>>,
}

/// Input for creating an announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
  pub title:    String,
  pub body:     String,
  pub audience: Option<String>,
}
