//! Handlers for `/milestones`.
//!
//! Milestones are plain solar events; no calendar conversion applies. Bodies
//! accept `start_date`/`end_date` as ISO dates and `time` as `"HH:MM"`.
//! The reminder lead time is dropped whenever `notify` is off.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use homecal_core::{
  milestone::{Milestone, NewMilestone, time_hm},
  normalize::LunarOracle,
  store::ScheduleStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, auth::CurrentUser, error::ApiError};

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MilestoneBody {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub start_date:  NaiveDate,
  #[serde(default)]
  pub end_date:    Option<NaiveDate>,
  #[serde(default, with = "time_hm")]
  pub time:        Option<NaiveTime>,
  #[serde(default)]
  pub notify:      bool,
  #[serde(default)]
  pub notify_before_hours: Option<u32>,
}

fn to_input(body: MilestoneBody, user_id: String) -> Result<NewMilestone, ApiError> {
  let input = NewMilestone {
    title: body.title,
    description: body.description,
    start_date: body.start_date,
    end_date: body.end_date,
    time: body.time,
    notify: body.notify,
    notify_before_hours: body.notify_before_hours,
    user_id,
  }
  .sanitized();
  input.validate()?;
  Ok(input)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /milestones`
pub async fn list<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Milestone>>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let milestones = state
    .store
    .list_milestones(&user)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(milestones))
}

/// `POST /milestones`
pub async fn create<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<MilestoneBody>,
) -> Result<(StatusCode, Json<Milestone>), ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let input = to_input(body, user)?;
  let milestone = state
    .store
    .add_milestone(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(milestone)))
}

/// `GET /milestones/:id`
pub async fn get_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Milestone>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let milestone = state
    .store
    .get_milestone(&user, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("milestone {id} not found")))?;
  Ok(Json(milestone))
}

/// `PUT /milestones/:id`
pub async fn update_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<MilestoneBody>,
) -> Result<Json<Milestone>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let input = to_input(body, user.clone())?;
  let milestone = state
    .store
    .update_milestone(&user, id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("milestone {id} not found")))?;
  Ok(Json(milestone))
}

/// `DELETE /milestones/:id`
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
    .delete_milestone(&user, id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("milestone {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
