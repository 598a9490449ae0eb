//! `GET /events` — the caller's change feed as Server-Sent Events.
//!
//! Mirrors the store's broadcast feed, filtered to the authenticated user's
//! own records. Clients re-fetch the affected collection on each event; a
//! receiver that lags far enough to drop events simply reconciles on its
//! next fetch. The subscription ends when the client disconnects and the
//! stream is dropped.

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use homecal_core::{normalize::LunarOracle, store::ScheduleStore};
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};

use crate::{ApiState, auth::CurrentUser};

/// `GET /events`
pub async fn stream<S, O>(
  State(state): State<ApiState<S, O>>,
  CurrentUser(user): CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
  S: ScheduleStore,
  O: LunarOracle,
{
  let feed = BroadcastStream::new(state.store.subscribe()).filter_map(move |result| {
    match result {
      Ok(ev) if ev.user_id == user => {
        Some(Event::default().event("change").json_data(&ev))
      }
      // Other users' events, and the lag marker of a slow receiver.
      _ => None,
    }
  });
  Sse::new(feed).keep_alive(KeepAlive::default())
}
