//! Handlers for `/links` — shared external calendar links.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use homecal_core::{
  link::{CalendarLink, NewCalendarLink},
  normalize::LunarOracle,
  store::ScheduleStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, auth::CurrentUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LinkBody {
  pub app_name: String,
  pub url:      String,
}

fn to_input(body: LinkBody, user_id: String) -> Result<NewCalendarLink, ApiError> {
  let input = NewCalendarLink {
    app_name: body.app_name,
    url: body.url,
    user_id,
  };
  input.validate()?;
  Ok(input)
}

/// `GET /links`
pub async fn list<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CalendarLink>>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let links = state.store.list_links(&user).await.map_err(ApiError::store)?;
  Ok(Json(links))
}

/// `POST /links`
pub async fn create<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<LinkBody>,
) -> Result<(StatusCode, Json<CalendarLink>), ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let input = to_input(body, user)?;
  let link = state.store.add_link(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(link)))
}

/// `GET /links/:id`
pub async fn get_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<CalendarLink>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let link = state
    .store
    .get_link(&user, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("link {id} not found")))?;
  Ok(Json(link))
}

/// `PUT /links/:id`
pub async fn update_one<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<LinkBody>,
) -> Result<Json<CalendarLink>, ApiError>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let input = to_input(body, user.clone())?;
  let link = state
    .store
    .update_link(&user, id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("link {id} not found")))?;
  Ok(Json(link))
}

/// `DELETE /links/:id`
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
    .delete_link(&user, id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("link {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use homecal_core::normalize::Normalizer;
  use homecal_lunar::TableOracle;
  use homecal_store_sqlite::SqliteStore;

  use super::*;

  async fn state() -> ApiState<SqliteStore, TableOracle> {
    ApiState {
      store:      Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      normalizer: Arc::new(Normalizer::new(TableOracle::new())),
    }
  }

  fn alice() -> CurrentUser {
    CurrentUser("alice".to_string())
  }

  #[tokio::test]
  async fn link_crud() {
    let state = state().await;
    let (status, Json(link)) = create(
      State(state.clone()),
      alice(),
      Json(LinkBody {
        app_name: "TimeTree".to_string(),
        url:      "https://timetreeapp.com/calendars/abc".to_string(),
      }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let Json(links) = list(State(state.clone()), alice()).await.unwrap();
    assert_eq!(links, [link.clone()]);

    let deleted = delete_one(State(state.clone()), alice(), Path(link.id))
      .await
      .unwrap();
    assert_eq!(deleted, StatusCode::NO_CONTENT);

    let Json(links) = list(State(state), alice()).await.unwrap();
    assert!(links.is_empty());
  }

  #[tokio::test]
  async fn blank_url_is_rejected() {
    let state = state().await;
    let err = create(
      State(state),
      alice(),
      Json(LinkBody {
        app_name: "TimeTree".to_string(),
        url:      String::new(),
      }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
  }
}
