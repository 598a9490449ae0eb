//! Error types for `homecal-core`.

use thiserror::Error;

use crate::date::CalendarType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The year/month/day triple does not form a real date under the stated
  /// calendar interpretation. Non-retryable; nothing is persisted.
  #[error("{year:04}-{month:02}-{day:02} is not a valid {calendar} date")]
  InvalidCalendarDate {
    year:     i32,
    month:    u8,
    day:      u8,
    calendar: CalendarType,
  },

  /// The conversion oracle could not compute a result (typically a year
  /// outside its supported range). Local failure of the one operation; not
  /// fatal to the caller.
  #[error("conversion oracle unavailable: {0}")]
  OracleUnavailable(String),

  #[error("{0} must not be empty")]
  EmptyField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
