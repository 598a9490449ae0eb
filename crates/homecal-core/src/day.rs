//! RememberDay — a recurring "day to remember" (birthday, memorial day,
//! wedding anniversary).
//!
//! `date` is always the canonical solar form produced by the normalization
//! service; `calendar_type` records which calendar system the user originally
//! entered the date in and never changes the storage format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, date::CalendarType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberDay {
  pub id:            Uuid,
  pub title:         String,
  pub description:   String,
  /// Canonical solar date; valid by construction.
  pub date:          NaiveDate,
  pub calendar_type: CalendarType,
  /// Opaque identity-provider subject; immutable after creation.
  pub user_id:       String,
}

/// Input to add/update operations. The store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewRememberDay {
  pub title:         String,
  pub description:   String,
  pub date:          NaiveDate,
  pub calendar_type: CalendarType,
  pub user_id:       String,
}

impl NewRememberDay {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyField("title"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(title: &str) -> NewRememberDay {
    NewRememberDay {
      title:         title.to_string(),
      description:   String::new(),
      date:          NaiveDate::from_ymd_opt(2023, 9, 29).unwrap(),
      calendar_type: CalendarType::Lunar,
      user_id:       "alice".to_string(),
    }
  }

  #[test]
  fn title_must_not_be_blank() {
    assert!(input("Mid-autumn").validate().is_ok());
    assert_eq!(input("").validate(), Err(Error::EmptyField("title")));
    assert_eq!(input("   ").validate(), Err(Error::EmptyField("title")));
  }
}
