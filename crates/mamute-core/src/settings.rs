//! Gym-wide settings: the timezone the schedule runs in and the barcode
//! prefix printed on membership cards.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "America/Toronto";
pub const DEFAULT_BARCODE_PREFIX: &str = "MMAA-";

/// A single-row configuration record. The resolver reads it fresh on every
/// call and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GymSettings {
  pub timezone:       String,
  pub barcode_prefix: String,
}

impl Default for GymSettings {
  fn default() -> Self {
    Self {
      timezone:       DEFAULT_TIMEZONE.to_owned(),
      barcode_prefix: DEFAULT_BARCODE_PREFIX.to_owned(),
    }
  }
}

impl GymSettings {
  /// The configured timezone as a [`Tz`], falling back to the default when
  /// the stored identifier is not a valid IANA zone.
  pub fn resolve_timezone(&self) -> Tz {
    self.timezone.parse().unwrap_or_else(|_| {
      DEFAULT_TIMEZONE
        .parse()
        .unwrap_or(chrono_tz::America::Toronto)
    })
  }
}
