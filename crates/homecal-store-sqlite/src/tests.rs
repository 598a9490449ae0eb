//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveTime};
use homecal_core::{
  date::CalendarType,
  day::NewRememberDay,
  link::NewCalendarLink,
  milestone::NewMilestone,
  store::{ChangeKind, Collection, ScheduleStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn day_input(user: &str, title: &str, d: NaiveDate) -> NewRememberDay {
  NewRememberDay {
    title:         title.to_string(),
    description:   String::new(),
    date:          d,
    calendar_type: CalendarType::Solar,
    user_id:       user.to_string(),
  }
}

fn milestone_input(user: &str, title: &str, start: NaiveDate) -> NewMilestone {
  NewMilestone {
    title:       title.to_string(),
    description: String::new(),
    start_date:  start,
    end_date:    None,
    time:        None,
    notify:      false,
    notify_before_hours: None,
    user_id:     user.to_string(),
  }
}

fn link_input(user: &str, app: &str) -> NewCalendarLink {
  NewCalendarLink {
    app_name: app.to_string(),
    url:      format!("https://example.com/{app}"),
    user_id:  user.to_string(),
  }
}

// ─── Days to remember ────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_day() {
  let s = store().await;

  let day = s
    .add_day(day_input("alice", "Mid-autumn", date(2023, 9, 29)))
    .await
    .unwrap();
  assert_eq!(day.title, "Mid-autumn");

  let fetched = s.get_day("alice", day.id).await.unwrap().unwrap();
  assert_eq!(fetched, day);
}

#[tokio::test]
async fn get_day_missing_returns_none() {
  let s = store().await;
  assert!(s.get_day("alice", Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn days_are_invisible_to_other_users() {
  let s = store().await;
  let day = s
    .add_day(day_input("alice", "Birthday", date(2024, 5, 2)))
    .await
    .unwrap();

  assert!(s.get_day("bob", day.id).await.unwrap().is_none());
  assert!(s.list_days("bob").await.unwrap().is_empty());
  assert!(
    s.update_day("bob", day.id, day_input("bob", "Stolen", date(2024, 5, 3)))
      .await
      .unwrap()
      .is_none()
  );
  assert!(!s.delete_day("bob", day.id).await.unwrap());

  // Still intact for the owner.
  let kept = s.get_day("alice", day.id).await.unwrap().unwrap();
  assert_eq!(kept.title, "Birthday");
}

#[tokio::test]
async fn list_days_is_ordered_by_date() {
  let s = store().await;
  s.add_day(day_input("alice", "Later", date(2024, 12, 25)))
    .await
    .unwrap();
  s.add_day(day_input("alice", "Earlier", date(2024, 1, 1)))
    .await
    .unwrap();
  s.add_day(day_input("alice", "Middle", date(2024, 6, 15)))
    .await
    .unwrap();

  let titles: Vec<_> = s
    .list_days("alice")
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.title)
    .collect();
  assert_eq!(titles, ["Earlier", "Middle", "Later"]);
}

#[tokio::test]
async fn update_day_replaces_all_fields() {
  let s = store().await;
  let day = s
    .add_day(day_input("alice", "Chuseok", date(2023, 9, 29)))
    .await
    .unwrap();

  let mut replacement = day_input("alice", "Chuseok 2024", date(2024, 9, 17));
  replacement.calendar_type = CalendarType::Lunar;
  replacement.description = "Lunar 8/15".to_string();

  let updated = s
    .update_day("alice", day.id, replacement)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.id, day.id);
  assert_eq!(updated.user_id, "alice");
  assert_eq!(updated.title, "Chuseok 2024");
  assert_eq!(updated.calendar_type, CalendarType::Lunar);

  let fetched = s.get_day("alice", day.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn delete_day_removes_the_record() {
  let s = store().await;
  let day = s
    .add_day(day_input("alice", "Temp", date(2024, 3, 3)))
    .await
    .unwrap();

  assert!(s.delete_day("alice", day.id).await.unwrap());
  assert!(s.get_day("alice", day.id).await.unwrap().is_none());
  // Idempotence: a second delete finds nothing.
  assert!(!s.delete_day("alice", day.id).await.unwrap());
}

#[tokio::test]
async fn blank_title_is_rejected() {
  let s = store().await;
  let err = s
    .add_day(day_input("alice", "  ", date(2024, 3, 3)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(homecal_core::Error::EmptyField("title"))));
}

// ─── Milestones ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn milestone_optionals_round_trip() {
  let s = store().await;

  let mut input = milestone_input("alice", "Move", date(2025, 3, 1));
  input.end_date = Some(date(2025, 3, 3));
  input.time = NaiveTime::from_hms_opt(9, 30, 0);
  input.notify = true;
  input.notify_before_hours = Some(24);

  let m = s.add_milestone(input).await.unwrap();
  let fetched = s.get_milestone("alice", m.id).await.unwrap().unwrap();
  assert_eq!(fetched, m);
  assert_eq!(fetched.end_date, Some(date(2025, 3, 3)));
  assert_eq!(fetched.time, NaiveTime::from_hms_opt(9, 30, 0));
  assert_eq!(fetched.notify_before_hours, Some(24));
}

#[tokio::test]
async fn milestone_without_end_date_stays_bare() {
  let s = store().await;
  let m = s
    .add_milestone(milestone_input("alice", "Move", date(2025, 3, 1)))
    .await
    .unwrap();

  let fetched = s.get_milestone("alice", m.id).await.unwrap().unwrap();
  assert_eq!(fetched.end_date, None);
  assert_eq!(fetched.time, None);
  assert_eq!(fetched.notify_before_hours, None);
}

#[tokio::test]
async fn store_drops_lead_time_when_notify_is_off() {
  let s = store().await;
  let mut input = milestone_input("alice", "Move", date(2025, 3, 1));
  input.notify = false;
  input.notify_before_hours = Some(3);

  let m = s.add_milestone(input).await.unwrap();
  assert_eq!(m.notify_before_hours, None);

  let fetched = s.get_milestone("alice", m.id).await.unwrap().unwrap();
  assert_eq!(fetched.notify_before_hours, None);
}

#[tokio::test]
async fn list_milestones_is_ordered_by_start_date() {
  let s = store().await;
  s.add_milestone(milestone_input("alice", "Second", date(2025, 6, 1)))
    .await
    .unwrap();
  s.add_milestone(milestone_input("alice", "First", date(2025, 1, 1)))
    .await
    .unwrap();

  let titles: Vec<_> = s
    .list_milestones("alice")
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.title)
    .collect();
  assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn update_milestone_scoped_to_owner() {
  let s = store().await;
  let m = s
    .add_milestone(milestone_input("alice", "Move", date(2025, 3, 1)))
    .await
    .unwrap();

  assert!(
    s.update_milestone("bob", m.id, milestone_input("bob", "Nope", date(2025, 4, 1)))
      .await
      .unwrap()
      .is_none()
  );

  let updated = s
    .update_milestone("alice", m.id, milestone_input("alice", "Move again", date(2025, 4, 1)))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.title, "Move again");
  assert_eq!(updated.start_date, date(2025, 4, 1));
}

// ─── Calendar links ──────────────────────────────────────────────────────────

#[tokio::test]
async fn links_crud_and_ordering() {
  let s = store().await;
  let b = s.add_link(link_input("alice", "TimeTree")).await.unwrap();
  s.add_link(link_input("alice", "Google")).await.unwrap();

  let names: Vec<_> = s
    .list_links("alice")
    .await
    .unwrap()
    .into_iter()
    .map(|l| l.app_name)
    .collect();
  assert_eq!(names, ["Google", "TimeTree"]);

  let mut replacement = link_input("alice", "TimeTree");
  replacement.url = "https://timetreeapp.com/new".to_string();
  let updated = s.update_link("alice", b.id, replacement).await.unwrap().unwrap();
  assert_eq!(updated.url, "https://timetreeapp.com/new");

  assert!(s.delete_link("alice", b.id).await.unwrap());
  assert!(s.get_link("alice", b.id).await.unwrap().is_none());
}

#[tokio::test]
async fn blank_link_url_is_rejected() {
  let s = store().await;
  let mut input = link_input("alice", "TimeTree");
  input.url = String::new();
  let err = s.add_link(input).await.unwrap_err();
  assert!(matches!(err, Error::Core(homecal_core::Error::EmptyField("url"))));
}

// ─── Change feed ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn mutations_publish_events_in_commit_order() {
  let s = store().await;
  let mut rx = s.subscribe();

  let day = s
    .add_day(day_input("alice", "Chuseok", date(2023, 9, 29)))
    .await
    .unwrap();
  s.update_day("alice", day.id, day_input("alice", "Chuseok!", date(2023, 9, 29)))
    .await
    .unwrap()
    .unwrap();
  s.delete_day("alice", day.id).await.unwrap();

  let first = rx.recv().await.unwrap();
  assert_eq!(first.user_id, "alice");
  assert_eq!(first.collection, Collection::Days);
  assert_eq!(first.kind, ChangeKind::Created);
  assert_eq!(first.id, day.id);

  assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Updated);
  assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Deleted);
}

#[tokio::test]
async fn failed_and_missed_mutations_publish_nothing() {
  let s = store().await;
  let mut rx = s.subscribe();

  // Validation failure: nothing persisted, nothing published.
  let _ = s.add_day(day_input("alice", "", date(2024, 1, 1))).await;
  // Update of a nonexistent record: no event either.
  let _ = s
    .update_day("alice", Uuid::new_v4(), day_input("alice", "X", date(2024, 1, 1)))
    .await;

  let link = s.add_link(link_input("alice", "TimeTree")).await.unwrap();
  let ev = rx.recv().await.unwrap();
  assert_eq!(ev.collection, Collection::Links);
  assert_eq!(ev.id, link.id);
}

#[tokio::test]
async fn events_carry_the_owning_user() {
  let s = store().await;
  let mut rx = s.subscribe();

  s.add_link(link_input("alice", "TimeTree")).await.unwrap();
  s.add_link(link_input("bob", "Google")).await.unwrap();

  assert_eq!(rx.recv().await.unwrap().user_id, "alice");
  assert_eq!(rx.recv().await.unwrap().user_id, "bob");
}
