//! The calendar normalization service.
//!
//! User-entered dates are tagged solar or lunar; storage is always the solar
//! form. [`Normalizer::normalize_for_storage`] maps input to the canonical
//! stored date and [`Normalizer::display_date`] maps a stored date back to
//! the calendar system the user originally chose, so the displayed value
//! reproduces exactly what was typed.
//!
//! Lunisolar arithmetic itself is delegated to a [`LunarOracle`]
//! implementation. The seam is a trait so the service can be exercised with a
//! deterministic fake covering leap-month and range edge cases, independent
//! of any real calendar-math backend.
//!
//! Every operation here is a pure function of its inputs: no clock, no
//! locale, no shared mutable state. Either it fully succeeds or it fails with
//! no output.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
  Error, Result,
  date::{CalendarType, LunarDate, RawDate},
};

// ─── Oracle seam ─────────────────────────────────────────────────────────────

/// Error returned by a [`LunarOracle`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OracleError {
  /// The requested year falls outside the data the oracle carries.
  #[error("year {year} is outside the supported range {min}..={max}")]
  UnsupportedYear { year: i32, min: i32, max: i32 },

  /// The year/month/day components name no real day in the lunar calendar
  /// (month out of 1..=12, day past the month's length, or a leap month the
  /// year does not have).
  #[error("{year:04}-{month:02}-{day:02} does not exist in the lunar calendar")]
  NoSuchLunarDate { year: i32, month: u8, day: u8 },
}

/// Pure solar/lunar conversion, covering the traditional East Asian
/// lunisolar calendar including leap months.
///
/// Both directions must be exact inverses over the oracle's supported range:
/// `solar_to_lunar(lunar_to_solar(d)) == d` for every valid `d`. The
/// normalization service treats the oracle as side-effect-free and never
/// retries it.
pub trait LunarOracle: Send + Sync {
  /// Full solar calendar date of the given lunar day.
  fn lunar_to_solar(&self, lunar: LunarDate) -> Result<NaiveDate, OracleError>;

  /// Lunar representation of the given solar day, leap flag included.
  fn solar_to_lunar(&self, solar: NaiveDate) -> Result<LunarDate, OracleError>;
}

impl<O: LunarOracle + ?Sized> LunarOracle for &O {
  fn lunar_to_solar(&self, lunar: LunarDate) -> Result<NaiveDate, OracleError> {
    (**self).lunar_to_solar(lunar)
  }

  fn solar_to_lunar(&self, solar: NaiveDate) -> Result<LunarDate, OracleError> {
    (**self).solar_to_lunar(solar)
  }
}

impl<O: LunarOracle + ?Sized> LunarOracle for std::sync::Arc<O> {
  fn lunar_to_solar(&self, lunar: LunarDate) -> Result<NaiveDate, OracleError> {
    (**self).lunar_to_solar(lunar)
  }

  fn solar_to_lunar(&self, solar: NaiveDate) -> Result<LunarDate, OracleError> {
    (**self).solar_to_lunar(solar)
  }
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Stateless calendar normalization over an injected [`LunarOracle`].
#[derive(Debug, Clone)]
pub struct Normalizer<O> {
  oracle: O,
}

impl<O: LunarOracle> Normalizer<O> {
  pub fn new(oracle: O) -> Self {
    Self { oracle }
  }

  /// Canonical solar date to persist for `input` expressed in `calendar`.
  ///
  /// Solar input is validated and passed through unchanged. Lunar input is
  /// the picker's y/m/d triple *reinterpreted* as lunar components (a picker
  /// cannot express a leap month, so the common month is meant) and converted
  /// to its solar equivalent.
  pub fn normalize_for_storage(
    &self,
    input: RawDate,
    calendar: CalendarType,
  ) -> Result<NaiveDate> {
    match calendar {
      CalendarType::Solar => input.to_solar().ok_or(Error::InvalidCalendarDate {
        year:     input.year,
        month:    input.month,
        day:      input.day,
        calendar: CalendarType::Solar,
      }),
      CalendarType::Lunar => self
        .oracle
        .lunar_to_solar(LunarDate::new(input.year, input.month, input.day))
        .map_err(|e| oracle_error(e, CalendarType::Lunar)),
    }
  }

  /// The date to show the user, in the calendar system they entered it in.
  ///
  /// Inverse of [`Self::normalize_for_storage`]: for any valid input `d`
  /// under calendar `t`, `display_date(normalize_for_storage(d, t)?, t)`
  /// reproduces `d`.
  pub fn display_date(
    &self,
    stored: NaiveDate,
    calendar: CalendarType,
  ) -> Result<RawDate> {
    match calendar {
      CalendarType::Solar => Ok(RawDate::from(stored)),
      CalendarType::Lunar => Ok(RawDate::from(self.display_lunar(stored)?)),
    }
  }

  /// Full lunar form of a stored solar date, leap flag included, for callers
  /// that render leap months distinctly.
  pub fn display_lunar(&self, stored: NaiveDate) -> Result<LunarDate> {
    self
      .oracle
      .solar_to_lunar(stored)
      .map_err(|e| oracle_error(e, CalendarType::Lunar))
  }
}

fn oracle_error(e: OracleError, calendar: CalendarType) -> Error {
  match e {
    OracleError::UnsupportedYear { .. } => Error::OracleUnavailable(e.to_string()),
    OracleError::NoSuchLunarDate { year, month, day } => Error::InvalidCalendarDate {
      year,
      month,
      day,
      calendar,
    },
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
