//! Schedule templates — recurring weekly class slots.
//!
//! A template is not a dated event: it names a weekday and wall-clock start
//! and end times in the gym's timezone. The check-in resolver picks "the
//! current class" by matching today's weekday and a ±30-minute window around
//! the start time.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring weekly class slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTemplate {
  pub schedule_id:   Uuid,
  /// Discipline tag, e.g. `"bjj"`, `"muay-thai"`.
  pub class_type:    String,
  pub instructor_id: Option<Uuid>,
  /// 0 = Sunday .. 6 = Saturday.
  pub day_of_week:   u8,
  #[serde(with = "wall_time")]
  pub start_time:    NaiveTime,
  #[serde(with = "wall_time")]
  pub end_time:      NaiveTime,
  /// IANA timezone identifier, e.g. `"America/Toronto"`.
  pub timezone:      String,
  pub active:        bool,
  pub created_at:    DateTime<Utc>,
}

impl ScheduleTemplate {
  /// Start time as minutes past midnight — the unit the session window
  /// arithmetic works in.
  pub fn start_minutes(&self) -> i32 {
    use chrono::Timelike;
    (self.start_time.hour() * 60 + self.start_time.minute()) as i32
  }
}

/// Input for creating a template. The store assigns the UUID and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
  pub class_type:    String,
  pub instructor_id: Option<Uuid>,
  pub day_of_week:   u8,
  #[serde(with = "wall_time")]
  pub start_time:    NaiveTime,
  #[serde(with = "wall_time")]
  pub end_time:      NaiveTime,
  pub timezone:      String,
  #[serde(default = "default_active")]
  pub active:        bool,
}

fn default_active() -> bool { true }

/// Partial update applied to an existing template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
  pub class_type:    Option<String>,
  pub instructor_id: Option<Uuid>,
  pub day_of_week:   Option<u8>,
  #[serde(default, with = "wall_time_opt")]
  pub start_time:    Option<NaiveTime>,
  #[serde(default, with = "wall_time_opt")]
  pub end_time:      Option<NaiveTime>,
  pub timezone:      Option<String>,
  pub active:        Option<bool>,
}

/// Serde codec for `"HH:MM"` wall-clock times — the format used both on the
/// wire and in the database.
pub mod wall_time {
  use chrono::NaiveTime;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub const FORMAT: &str = "%H:%M";

  pub fn serialize<S: Serializer>(
    time: &NaiveTime,
    ser: S,
  ) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&time.format(FORMAT).to_string())
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    de: D,
  ) -> Result<NaiveTime, D::Error> {
    let s = String::deserialize(de)?;
    parse(&s).map_err(D::Error::custom)
  }

  /// Parse `"HH:MM"`; tolerate a trailing `:SS` as stored by some admin
  /// tooling.
  pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, FORMAT)
      .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
  }

  pub fn format(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
  }
}

/// `Option<NaiveTime>` variant of [`wall_time`] for patch bodies.
pub mod wall_time_opt {
  use chrono::NaiveTime;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    time: &Option<NaiveTime>,
    ser: S,
  ) -> Result<S::Ok, S::Error> {
    match time {
      Some(t) => super::wall_time::serialize(t, ser),
      None => ser.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    de: D,
  ) -> Result<Option<NaiveTime>, D::Error> {
    let s = Option::<String>::deserialize(de)?;
    s.map(|s| super::wall_time::parse(&s).map_err(D::Error::custom))
      .transpose()
  }
}
