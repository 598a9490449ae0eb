//! Milestone — a one-off event with an optional end date, time of day, and
//! email-reminder preference.
//!
//! Milestones are plain solar dates; no calendar conversion applies. The
//! reminder fields are stored preferences only — delivery is somebody else's
//! job.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub start_date:  NaiveDate,
  /// Absent fields are omitted from serialized output entirely, never
  /// emitted as an explicit null.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date:    Option<NaiveDate>,
  #[serde(default, with = "time_hm", skip_serializing_if = "Option::is_none")]
  pub time:        Option<NaiveTime>,
  pub notify:      bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notify_before_hours: Option<u32>,
  pub user_id:     String,
}

/// Input to add/update operations. The store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewMilestone {
  pub title:       String,
  pub description: String,
  pub start_date:  NaiveDate,
  pub end_date:    Option<NaiveDate>,
  pub time:        Option<NaiveTime>,
  pub notify:      bool,
  pub notify_before_hours: Option<u32>,
  pub user_id:     String,
}

impl NewMilestone {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyField("title"));
    }
    Ok(())
  }

  /// Drop the reminder lead time when reminders are off, so a stale value
  /// from a toggled-off form never reaches storage.
  pub fn sanitized(mut self) -> Self {
    if !self.notify {
      self.notify_before_hours = None;
    }
    self
  }
}

/// Serde helper: `Option<NaiveTime>` as an `"HH:MM"` string.
pub mod time_hm {
  use chrono::NaiveTime;
  use serde::{Deserialize, Deserializer, Serializer};

  pub const FORMAT: &str = "%H:%M";

  pub fn serialize<S: Serializer>(
    value: &Option<NaiveTime>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match value {
      Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<NaiveTime>, D::Error> {
    Option::<String>::deserialize(deserializer)?
      .map(|s| NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
      .transpose()
  }
}
