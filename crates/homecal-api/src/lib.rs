//! JSON REST API for homecal.
//!
//! Exposes an axum [`Router`] backed by any [`homecal_core::store::ScheduleStore`]
//! plus a [`Normalizer`] over any lunar oracle. Transport concerns (TLS,
//! listening) and authentication are the caller's responsibility: every
//! handler reads the caller's identity from an [`auth::AuthenticatedUser`]
//! request extension, which the server layer installs after verifying
//! credentials.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", homecal_api::api_router(store, normalizer))
//! ```

pub mod auth;
pub mod days;
pub mod error;
pub mod events;
pub mod links;
pub mod milestones;

use std::sync::Arc;

use axum::{Router, routing::get};
use homecal_core::{normalize::{LunarOracle, Normalizer}, store::ScheduleStore};

pub use error::ApiError;

/// Shared state threaded through all axum handlers.
pub struct ApiState<S, O> {
  pub store:      Arc<S>,
  pub normalizer: Arc<Normalizer<O>>,
}

// Manual impl: `derive(Clone)` would demand `S: Clone` and `O: Clone`.
impl<S, O> Clone for ApiState<S, O> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      normalizer: Arc::clone(&self.normalizer),
    }
  }
}

/// Build a fully-materialised API router for `store` and `normalizer`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, O>(store: Arc<S>, normalizer: Arc<Normalizer<O>>) -> Router<()>
where
  S: ScheduleStore + 'static,
  O: LunarOracle + 'static,
{
  let state = ApiState { store, normalizer };
  Router::new()
    // Days to remember
    .route("/days", get(days::list::<S, O>).post(days::create::<S, O>))
    .route(
      "/days/{id}",
      get(days::get_one::<S, O>)
        .put(days::update_one::<S, O>)
        .delete(days::delete_one::<S, O>),
    )
    // Milestones
    .route(
      "/milestones",
      get(milestones::list::<S, O>).post(milestones::create::<S, O>),
    )
    .route(
      "/milestones/{id}",
      get(milestones::get_one::<S, O>)
        .put(milestones::update_one::<S, O>)
        .delete(milestones::delete_one::<S, O>),
    )
    // Shared calendar links
    .route("/links", get(links::list::<S, O>).post(links::create::<S, O>))
    .route(
      "/links/{id}",
      get(links::get_one::<S, O>)
        .put(links::update_one::<S, O>)
        .delete(links::delete_one::<S, O>),
    )
    // Change feed
    .route("/events", get(events::stream::<S, O>))
    .with_state(state)
}
