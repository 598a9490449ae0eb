//! Table-driven lunisolar oracle for the traditional East Asian lunisolar
//! calendar.
//!
//! Conversion walks precomputed month-length tables from a fixed epoch
//! (1900-01-31, the solar date of lunar 1900-01-01) rather than re-deriving
//! calendar astronomy. Years outside the tables fail with
//! [`OracleError::UnsupportedYear`]; the oracle seam in `homecal-core` lets a
//! wider implementation be swapped in without touching the normalization
//! logic.

mod tables;

use chrono::{Datelike, Days, NaiveDate};
use homecal_core::{
  date::LunarDate,
  normalize::{LunarOracle, OracleError},
};
use tables::{FIRST_YEAR, LAST_YEAR, YEAR_INFO};

/// Solar date of lunar 1900-01-01, the first day the tables cover.
const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 31) {
  Some(d) => d,
  None => unreachable!(),
};

/// Lunisolar conversion backed by the precomputed tables in [`tables`].
///
/// Stateless and `Copy`; construct freely wherever one is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOracle;

impl TableOracle {
  pub fn new() -> Self {
    Self
  }

  /// Inclusive range of lunar years this oracle can convert.
  pub fn supported_years() -> std::ops::RangeInclusive<i32> {
    FIRST_YEAR..=LAST_YEAR
  }
}

// ─── Table accessors ─────────────────────────────────────────────────────────

fn year_info(year: i32) -> Result<u32, OracleError> {
  if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
    return Err(OracleError::UnsupportedYear {
      year,
      min: FIRST_YEAR,
      max: LAST_YEAR,
    });
  }
  Ok(YEAR_INFO[(year - FIRST_YEAR) as usize])
}

/// Number of the month followed by a leap month, 0 when the year has none.
fn leap_month(info: u32) -> u8 {
  (info & 0xf) as u8
}

/// Length of the year's leap month, 0 when the year has none.
fn leap_days(info: u32) -> u32 {
  if leap_month(info) == 0 {
    0
  } else if info & 0x10000 != 0 {
    30
  } else {
    29
  }
}

/// Length of common month `month` (1..=12).
fn month_days(info: u32, month: u8) -> u32 {
  if info & (0x10000 >> month) != 0 { 30 } else { 29 }
}

/// Total days in the lunar year, leap month included.
fn year_days(info: u32) -> u32 {
  (1..=12).map(|m| month_days(info, m)).sum::<u32>() + leap_days(info)
}

// ─── Conversion ──────────────────────────────────────────────────────────────

impl LunarOracle for TableOracle {
  fn lunar_to_solar(&self, lunar: LunarDate) -> Result<NaiveDate, OracleError> {
    let info = year_info(lunar.year)?;
    let no_such_date = OracleError::NoSuchLunarDate {
      year:  lunar.year,
      month: lunar.month,
      day:   lunar.day,
    };

    if lunar.month < 1 || lunar.month > 12 {
      return Err(no_such_date);
    }
    if lunar.leap && leap_month(info) != lunar.month {
      return Err(no_such_date);
    }
    let days_in_month = if lunar.leap {
      leap_days(info)
    } else {
      month_days(info, lunar.month)
    };
    if lunar.day < 1 || u32::from(lunar.day) > days_in_month {
      return Err(no_such_date);
    }

    let mut offset: u64 = 0;
    for y in FIRST_YEAR..lunar.year {
      offset += u64::from(year_days(year_info(y)?));
    }
    let lm = leap_month(info);
    for m in 1..lunar.month {
      offset += u64::from(month_days(info, m));
      if lm == m {
        offset += u64::from(leap_days(info));
      }
    }
    if lunar.leap {
      // The leap month follows its common namesake.
      offset += u64::from(month_days(info, lunar.month));
    }
    offset += u64::from(lunar.day) - 1;

    EPOCH
      .checked_add_days(Days::new(offset))
      .ok_or(no_such_date)
  }

  fn solar_to_lunar(&self, solar: NaiveDate) -> Result<LunarDate, OracleError> {
    let out_of_range = OracleError::UnsupportedYear {
      year: solar.year(),
      min:  FIRST_YEAR,
      max:  LAST_YEAR,
    };

    let mut remaining = solar.signed_duration_since(EPOCH).num_days();
    if remaining < 0 {
      return Err(out_of_range);
    }

    let mut year = FIRST_YEAR;
    loop {
      if year > LAST_YEAR {
        return Err(out_of_range);
      }
      let len = i64::from(year_days(year_info(year)?));
      if remaining < len {
        break;
      }
      remaining -= len;
      year += 1;
    }

    let info = year_info(year)?;
    let lm = leap_month(info);
    let mut month: u8 = 1;
    let mut leap = false;
    loop {
      let len = i64::from(if leap {
        leap_days(info)
      } else {
        month_days(info, month)
      });
      if remaining < len {
        break;
      }
      remaining -= len;
      if !leap && lm == month {
        leap = true;
      } else {
        leap = false;
        month += 1;
      }
    }

    Ok(LunarDate {
      year,
      month,
      day: (remaining + 1) as u8,
      leap,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
