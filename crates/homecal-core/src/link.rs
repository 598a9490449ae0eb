//! CalendarLink — a shared external calendar (a named app plus its URL).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarLink {
  pub id:       Uuid,
  pub app_name: String,
  pub url:      String,
  pub user_id:  String,
}

/// Input to add/update operations. The store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewCalendarLink {
  pub app_name: String,
  pub url:      String,
  pub user_id:  String,
}

impl NewCalendarLink {
  pub fn validate(&self) -> Result<()> {
    if self.app_name.trim().is_empty() {
      return Err(Error::EmptyField("app_name"));
    }
    if self.url.trim().is_empty() {
      return Err(Error::EmptyField("url"));
    }
    Ok(())
  }
}
