//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO `YYYY-MM-DD` strings (date-only, no timezone) so
//! lexicographic ordering matches chronological ordering. Times are stored as
//! `HH:MM`. UUIDs are stored as hyphenated lowercase strings.

use chrono::{NaiveDate, NaiveTime};
use homecal_core::{
  date::CalendarType,
  day::RememberDay,
  link::CalendarLink,
  milestone::{Milestone, time_hm},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String {
  d.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_time(t: NaiveTime) -> String {
  t.format(time_hm::FORMAT).to_string()
}

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, time_hm::FORMAT)
    .map_err(|e| Error::Decode(format!("time {s:?}: {e}")))
}

// ─── CalendarType ────────────────────────────────────────────────────────────

pub fn encode_calendar_type(t: CalendarType) -> &'static str {
  match t {
    CalendarType::Solar => "solar",
    CalendarType::Lunar => "lunar",
  }
}

pub fn decode_calendar_type(s: &str) -> Result<CalendarType> {
  match s {
    "solar" => Ok(CalendarType::Solar),
    "lunar" => Ok(CalendarType::Lunar),
    other => Err(Error::Decode(format!("unknown calendar type: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `remember_days` row.
pub struct RawRememberDay {
  pub id:            String,
  pub user_id:       String,
  pub title:         String,
  pub description:   String,
  pub date:          String,
  pub calendar_type: String,
}

impl RawRememberDay {
  pub fn into_day(self) -> Result<RememberDay> {
    Ok(RememberDay {
      id:            decode_uuid(&self.id)?,
      title:         self.title,
      description:   self.description,
      date:          decode_date(&self.date)?,
      calendar_type: decode_calendar_type(&self.calendar_type)?,
      user_id:       self.user_id,
    })
  }
}

/// Raw strings read directly from a `milestones` row.
pub struct RawMilestone {
  pub id:          String,
  pub user_id:     String,
  pub title:       String,
  pub description: String,
  pub start_date:  String,
  pub end_date:    Option<String>,
  pub time:        Option<String>,
  pub notify:      bool,
  pub notify_before_hours: Option<u32>,
}

impl RawMilestone {
  pub fn into_milestone(self) -> Result<Milestone> {
    Ok(Milestone {
      id:          decode_uuid(&self.id)?,
      title:       self.title,
      description: self.description,
      start_date:  decode_date(&self.start_date)?,
      end_date:    self.end_date.as_deref().map(decode_date).transpose()?,
      time:        self.time.as_deref().map(decode_time).transpose()?,
      notify:      self.notify,
      notify_before_hours: self.notify_before_hours,
      user_id:     self.user_id,
    })
  }
}

/// Raw strings read directly from a `calendar_links` row.
pub struct RawCalendarLink {
  pub id:       String,
  pub user_id:  String,
  pub app_name: String,
  pub url:      String,
}

impl RawCalendarLink {
  pub fn into_link(self) -> Result<CalendarLink> {
    Ok(CalendarLink {
      id:       decode_uuid(&self.id)?,
      app_name: self.app_name,
      url:      self.url,
      user_id:  self.user_id,
    })
  }
}
