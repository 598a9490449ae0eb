//! Calendar-date primitives shared by every layer.
//!
//! Stored dates are always `chrono::NaiveDate` in the solar (Gregorian)
//! calendar — the canonical storage form. User input arrives as a [`RawDate`]
//! triple paired with a [`CalendarType`] naming the calendar system the user
//! expressed it in.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which calendar system a user expressed a date in.
///
/// This is provenance metadata, not a storage format: records always store
/// the solar form, and keep this tag so the original entry can be
/// reconstructed for display and anniversary computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
  Solar,
  Lunar,
}

impl fmt::Display for CalendarType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Solar => f.write_str("solar"),
      Self::Lunar => f.write_str("lunar"),
    }
  }
}

/// An unvalidated year/month/day triple, exactly as a date-picker widget
/// produces it.
///
/// A `RawDate` carries no calendar system of its own. The same triple may be
/// interpreted as solar or lunar depending on the [`CalendarType`] supplied
/// alongside it — the calendar tag is always an explicit parameter, never
/// inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDate {
  pub year:  i32,
  pub month: u8,
  pub day:   u8,
}

impl RawDate {
  pub fn new(year: i32, month: u8, day: u8) -> Self {
    Self { year, month, day }
  }

  /// Interpret the triple as a solar date. `None` when it names no real day
  /// (Feb 30, month 13, ...).
  pub fn to_solar(self) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
  }
}

impl From<NaiveDate> for RawDate {
  fn from(d: NaiveDate) -> Self {
    Self {
      year:  d.year(),
      month: d.month() as u8,
      day:   d.day() as u8,
    }
  }
}

impl fmt::Display for RawDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
  }
}

/// A date in the traditional East Asian lunisolar calendar.
///
/// `leap` marks a day inside a leap month, which repeats the month number it
/// follows. Date-picker input can never express a leap month, so normalized
/// user input always has `leap == false`; the flag appears on dates produced
/// by solar-to-lunar conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDate {
  pub year:  i32,
  pub month: u8,
  pub day:   u8,
  #[serde(default)]
  pub leap:  bool,
}

impl LunarDate {
  /// A day in a common (non-leap) month.
  pub fn new(year: i32, month: u8, day: u8) -> Self {
    Self { year, month, day, leap: false }
  }

  /// A day in the leap month following common month `month`.
  pub fn leap(year: i32, month: u8, day: u8) -> Self {
    Self { year, month, day, leap: true }
  }
}

impl From<LunarDate> for RawDate {
  fn from(d: LunarDate) -> Self {
    Self {
      year:  d.year,
      month: d.month,
      day:   d.day,
    }
  }
}

impl fmt::Display for LunarDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{:04}-{}{:02}-{:02}",
      self.year,
      if self.leap { "leap " } else { "" },
      self.month,
      self.day
    )
  }
}
