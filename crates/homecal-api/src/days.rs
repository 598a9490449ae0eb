//! Handlers for `/days` — the days-to-remember collection.
//!
//! | Method   | Path        | Notes |
//! |----------|-------------|-------|
//! | `GET`    | `/days`     | Caller's days, ordered by stored solar date |
//! | `POST`   | `/days`     | Body: title, description, date, calendar_type |
//! | `GET`    | `/days/:id` | 404 if not found or not the caller's |
//! | `PUT`    | `/days/:id` | Full replacement |
//! | `DELETE` | `/days/:id` | 204 on success |
//!
//! Write bodies carry the picker's raw y/m/d triple plus the calendar tag;
//! the handler normalizes to the canonical solar date before anything is
//! persisted, and rejects impossible dates with 422. Responses carry both
//! the stored solar date and the display form in the entry calendar.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use homecal_core::{
  date::{CalendarType, RawDate},
  day::{NewRememberDay, RememberDay},
  normalize::{LunarOracle, Normalizer},
  store::ScheduleStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, auth::CurrentUser, error::ApiError};

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DayBody {
  pub title:         String,
  #[serde(default)]
  pub description:   String,
  /// Picker triple, interpreted in `calendar_type`.
  pub date:          RawDate,
  pub calendar_type: CalendarType,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
  #[serde(flatten)]
  pub day:          RememberDay,
  /// The date in the calendar system the user entered it in.
  pub display_date: RawDate,
}

impl DayResponse {
  fn new<O: LunarOracle>(
    normalizer: &Normalizer<O>,
    day: RememberDay,
  ) -> Result<Self, ApiError> {
    // A stored date that no longer displays is an internal inconsistency,
    // not a caller mistake.
    let display_date = normalizer
      .display_date(day.date, day.calendar_type)
      .map_err(ApiError::store)?;
    Ok(Self { day, display_date })
  }
}

fn to_input<O: LunarOracle>(
  normalizer: &Normalizer<O>,
  body: DayBody,
  user_id: String,
) -> Result<NewRememberDay, ApiError> {
  let date = normalizer.normalize_for_storage(body.date, body.calendar_type)?;
  let input = NewRememberDay {
    title: body.title,
    description: body.description,
    date,
    calendar_type: body.calendar_type,
    user_id,
  };
  input.validate()?;
  Ok(input)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /days`
pub async fn list<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<DayResponse>>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let days = state.store.list_days(&user).await.map_err(ApiError::store)?;
  let days = days
    .into_iter()
    .map(|d| DayResponse::new(&state.normalizer, d))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(Json(days))
}

/// `POST /days`
pub async fn create<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<DayBody>,
) -> Result<(StatusCode, Json<DayResponse>), ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let input = to_input(&state.normalizer, body, user)?;
  let day = state.store.add_day(input).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(DayResponse::new(&state.normalizer, day)?),
  ))
}

/// `GET /days/:id`
pub async fn get_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<DayResponse>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let day = state
    .store
    .get_day(&user, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("day {id} not found")))?;
  Ok(Json(DayResponse::new(&state.normalizer, day)?))
}

/// `PUT /days/:id`
pub async fn update_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<DayBody>,
) -> Result<Json<DayResponse>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let input = to_input(&state.normalizer, body, user.clone())?;
  let day = state
    .store
    .update_day(&user, id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("day {id} not found")))?;
  Ok(Json(DayResponse::new(&state.normalizer, day)?))
}

/// `DELETE /days/:id`
pub async fn delete_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let deleted = state
    .store
    .delete_day(&user, id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("day {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use chrono::NaiveDate;
  use homecal_lunar::TableOracle;
  use homecal_store_sqlite::SqliteStore;

  use super::*;

  async fn state() -> ApiState<SqliteStore, TableOracle> {
    ApiState {
      store:      Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      normalizer: Arc::new(Normalizer::new(TableOracle::new())),
    }
  }

  fn body(title: &str, date: RawDate, calendar_type: CalendarType) -> DayBody {
    DayBody {
      title: title.to_string(),
      description: String::new(),
      date,
      calendar_type,
    }
  }

  fn alice() -> CurrentUser {
    CurrentUser("alice".to_string())
  }

  #[tokio::test]
  async fn create_solar_day_stores_the_input_date() {
    let state = state().await;
    let (status, Json(resp)) = create(
      State(state.clone()),
      alice(),
      Json(body("New year", RawDate::new(2024, 1, 1), CalendarType::Solar)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp.day.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(resp.display_date, RawDate::new(2024, 1, 1));
  }

  #[tokio::test]
  async fn create_lunar_day_normalizes_and_displays_the_entry_form() {
    let state = state().await;
    let (_, Json(resp)) = create(
      State(state.clone()),
      alice(),
      Json(body("Mid-autumn", RawDate::new(2023, 8, 15), CalendarType::Lunar)),
    )
    .await
    .unwrap();

    // Stored canonically as solar, displayed as the lunar date entered.
    assert_eq!(resp.day.date, NaiveDate::from_ymd_opt(2023, 9, 29).unwrap());
    assert_eq!(resp.day.calendar_type, CalendarType::Lunar);
    assert_eq!(resp.display_date, RawDate::new(2023, 8, 15));
  }

  #[tokio::test]
  async fn impossible_date_is_rejected_before_the_store() {
    let state = state().await;
    let err = create(
      State(state.clone()),
      alice(),
      Json(body("Bad", RawDate::new(2024, 2, 30), CalendarType::Solar)),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Invalid(_)));
    let days = list(State(state), alice()).await.unwrap();
    assert!(days.0.is_empty());
  }

  #[tokio::test]
  async fn blank_title_is_rejected() {
    let state = state().await;
    let err = create(
      State(state),
      alice(),
      Json(body("  ", RawDate::new(2024, 1, 1), CalendarType::Solar)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
  }

  #[tokio::test]
  async fn foreign_records_read_as_not_found() {
    let state = state().await;
    let (_, Json(resp)) = create(
      State(state.clone()),
      alice(),
      Json(body("Mine", RawDate::new(2024, 1, 1), CalendarType::Solar)),
    )
    .await
    .unwrap();

    let bob = CurrentUser("bob".to_string());
    let err = get_one(State(state.clone()), bob.clone(), Path(resp.day.id))
      .await
      .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = delete_one(State(state), bob, Path(resp.day.id))
      .await
      .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
  }

  #[tokio::test]
  async fn update_replaces_and_renormalizes() {
    let state = state().await;
    let (_, Json(created)) = create(
      State(state.clone()),
      alice(),
      Json(body("Chuseok", RawDate::new(2023, 8, 15), CalendarType::Lunar)),
    )
    .await
    .unwrap();

    let Json(updated) = update_one(
      State(state),
      alice(),
      Path(created.day.id),
      Json(body("Chuseok 2024", RawDate::new(2024, 8, 15), CalendarType::Lunar)),
    )
    .await
    .unwrap();

    assert_eq!(updated.day.id, created.day.id);
    // Lunar 2024-08-15 is solar 2024-09-17.
    assert_eq!(updated.day.date, NaiveDate::from_ymd_opt(2024, 9, 17).unwrap());
    assert_eq!(updated.display_date, RawDate::new(2024, 8, 15));
  }
}
