//! The `ScheduleStore` trait and the change-feed types.
//!
//! The trait is implemented by storage backends (e.g. `homecal-store-sqlite`).
//! Higher layers (`homecal-api`, `homecal-server`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Every record is owned by exactly one user. Reads are scoped to the owner,
//! and update/delete silently miss (return `None`/`false`) when the id exists
//! but belongs to someone else — callers cannot distinguish "not yours" from
//! "not there".

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
  day::{NewRememberDay, RememberDay},
  link::{CalendarLink, NewCalendarLink},
  milestone::{Milestone, NewMilestone},
};

// ─── Change feed ─────────────────────────────────────────────────────────────

/// Which record collection a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
  Days,
  Milestones,
  Links,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
  Created,
  Updated,
  Deleted,
}

/// Pushed to subscribers after a mutation commits. Events for a given record
/// arrive in the order the mutations were committed; there are no merge
/// semantics, the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
  pub user_id:    String,
  pub collection: Collection,
  pub kind:       ChangeKind,
  pub id:         Uuid,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a homecal schedule store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Days to remember ──────────────────────────────────────────────────

  /// Persist a new day with a fresh id and return it.
  fn add_day(
    &self,
    input: NewRememberDay,
  ) -> impl Future<Output = Result<RememberDay, Self::Error>> + Send + '_;

  /// Fetch one of `user_id`'s days. `None` if absent or owned by another
  /// user.
  fn get_day<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<RememberDay>, Self::Error>> + Send + 'a;

  /// All of `user_id`'s days, ordered by date.
  fn list_days<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<RememberDay>, Self::Error>> + Send + 'a;

  /// Replace every mutable field of a day in place; id and owner are
  /// preserved. `None` if absent or owned by another user.
  fn update_day<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
    input: NewRememberDay,
  ) -> impl Future<Output = Result<Option<RememberDay>, Self::Error>> + Send + 'a;

  /// Hard-delete. `false` if absent or owned by another user.
  fn delete_day<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Milestones ────────────────────────────────────────────────────────

  fn add_milestone(
    &self,
    input: NewMilestone,
  ) -> impl Future<Output = Result<Milestone, Self::Error>> + Send + '_;

  fn get_milestone<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Milestone>, Self::Error>> + Send + 'a;

  /// All of `user_id`'s milestones, ordered by start date.
  fn list_milestones<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Milestone>, Self::Error>> + Send + 'a;

  fn update_milestone<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
    input: NewMilestone,
  ) -> impl Future<Output = Result<Option<Milestone>, Self::Error>> + Send + 'a;

  fn delete_milestone<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Calendar links ────────────────────────────────────────────────────

  fn add_link(
    &self,
    input: NewCalendarLink,
  ) -> impl Future<Output = Result<CalendarLink, Self::Error>> + Send + '_;

  fn get_link<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CalendarLink>, Self::Error>> + Send + 'a;

  /// All of `user_id`'s links, ordered by app name.
  fn list_links<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<CalendarLink>, Self::Error>> + Send + 'a;

  fn update_link<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
    input: NewCalendarLink,
  ) -> impl Future<Output = Result<Option<CalendarLink>, Self::Error>> + Send + 'a;

  fn delete_link<'a>(
    &'a self,
    user_id: &'a str,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Change feed ───────────────────────────────────────────────────────

  /// Subscribe to committed changes across all users; subscribers filter by
  /// `user_id`. Dropping the receiver cancels the subscription.
  fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
