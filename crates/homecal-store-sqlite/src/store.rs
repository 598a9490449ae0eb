//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tokio::sync::broadcast;
use uuid::Uuid;

use homecal_core::{
  day::{NewRememberDay, RememberDay},
  link::{CalendarLink, NewCalendarLink},
  milestone::{Milestone, NewMilestone},
  store::{ChangeEvent, ChangeKind, Collection, ScheduleStore},
};

use crate::{
  Error, Result,
  encode::{
    RawCalendarLink, RawMilestone, RawRememberDay, encode_calendar_type,
    encode_date, encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

/// Events buffered per subscriber before slow receivers start lagging.
const CHANGE_FEED_CAPACITY: usize = 256;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A homecal schedule store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and the change-feed sender are
/// both reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  events: broadcast::Sender<ChangeEvent>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let (events, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
    let store = Self { conn, events };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Push a committed change to subscribers. `send` only errs when nobody is
  /// listening, which is fine.
  fn publish(&self, user_id: &str, collection: Collection, kind: ChangeKind, id: Uuid) {
    tracing::debug!(user = user_id, ?collection, ?kind, %id, "change committed");
    let _ = self.events.send(ChangeEvent {
      user_id: user_id.to_string(),
      collection,
      kind,
      id,
    });
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Days to remember ──────────────────────────────────────────────────────

  async fn add_day(&self, input: NewRememberDay) -> Result<RememberDay> {
    input.validate()?;
    let day = RememberDay {
      id:            Uuid::new_v4(),
      title:         input.title,
      description:   input.description,
      date:          input.date,
      calendar_type: input.calendar_type,
      user_id:       input.user_id,
    };

    let id_str   = encode_uuid(day.id);
    let user_id  = day.user_id.clone();
    let title    = day.title.clone();
    let desc     = day.description.clone();
    let date_str = encode_date(day.date);
    let cal_str  = encode_calendar_type(day.calendar_type).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO remember_days (id, user_id, title, description, date, calendar_type)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, user_id, title, desc, date_str, cal_str],
        )?;
        Ok(())
      })
      .await?;

    self.publish(&day.user_id, Collection::Days, ChangeKind::Created, day.id);
    Ok(day)
  }

  async fn get_day(&self, user_id: &str, id: Uuid) -> Result<Option<RememberDay>> {
    let id_str = encode_uuid(id);
    let user   = user_id.to_owned();

    let raw: Option<RawRememberDay> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT id, user_id, title, description, date, calendar_type
             FROM remember_days WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id_str, user],
            |r| {
              Ok(RawRememberDay {
                id:            r.get(0)?,
                user_id:       r.get(1)?,
                title:         r.get(2)?,
                description:   r.get(3)?,
                date:          r.get(4)?,
                calendar_type: r.get(5)?,
              })
            },
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawRememberDay::into_day).transpose()
  }

  async fn list_days(&self, user_id: &str) -> Result<Vec<RememberDay>> {
    let user = user_id.to_owned();

    let raws: Vec<RawRememberDay> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, user_id, title, description, date, calendar_type
           FROM remember_days WHERE user_id = ?1 ORDER BY date, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |r| {
            Ok(RawRememberDay {
              id:            r.get(0)?,
              user_id:       r.get(1)?,
              title:         r.get(2)?,
              description:   r.get(3)?,
              date:          r.get(4)?,
              calendar_type: r.get(5)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRememberDay::into_day).collect()
  }

  async fn update_day(
    &self,
    user_id: &str,
    id: Uuid,
    input: NewRememberDay,
  ) -> Result<Option<RememberDay>> {
    input.validate()?;

    let id_str   = encode_uuid(id);
    let user     = user_id.to_owned();
    let title    = input.title.clone();
    let desc     = input.description.clone();
    let date_str = encode_date(input.date);
    let cal_str  = encode_calendar_type(input.calendar_type).to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE remember_days
           SET title = ?3, description = ?4, date = ?5, calendar_type = ?6
           WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user, title, desc, date_str, cal_str],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.publish(user_id, Collection::Days, ChangeKind::Updated, id);
    Ok(Some(RememberDay {
      id,
      title:         input.title,
      description:   input.description,
      date:          input.date,
      calendar_type: input.calendar_type,
      user_id:       user_id.to_owned(),
    }))
  }

  async fn delete_day(&self, user_id: &str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let user   = user_id.to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "DELETE FROM remember_days WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(false);
    }
    self.publish(user_id, Collection::Days, ChangeKind::Deleted, id);
    Ok(true)
  }

  // ── Milestones ────────────────────────────────────────────────────────────

  async fn add_milestone(&self, input: NewMilestone) -> Result<Milestone> {
    input.validate()?;
    let input = input.sanitized();
    let milestone = Milestone {
      id:          Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      start_date:  input.start_date,
      end_date:    input.end_date,
      time:        input.time,
      notify:      input.notify,
      notify_before_hours: input.notify_before_hours,
      user_id:     input.user_id,
    };

    let id_str    = encode_uuid(milestone.id);
    let user_id   = milestone.user_id.clone();
    let title     = milestone.title.clone();
    let desc      = milestone.description.clone();
    let start_str = encode_date(milestone.start_date);
    let end_str   = milestone.end_date.map(encode_date);
    let time_str  = milestone.time.map(encode_time);
    let notify    = milestone.notify;
    let before    = milestone.notify_before_hours;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO milestones (
             id, user_id, title, description, start_date,
             end_date, time, notify, notify_before_hours
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, user_id, title, desc, start_str, end_str, time_str, notify,
            before,
          ],
        )?;
        Ok(())
      })
      .await?;

    self.publish(
      &milestone.user_id,
      Collection::Milestones,
      ChangeKind::Created,
      milestone.id,
    );
    Ok(milestone)
  }

  async fn get_milestone(&self, user_id: &str, id: Uuid) -> Result<Option<Milestone>> {
    let id_str = encode_uuid(id);
    let user   = user_id.to_owned();

    let raw: Option<RawMilestone> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT id, user_id, title, description, start_date,
                    end_date, time, notify, notify_before_hours
             FROM milestones WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id_str, user],
            map_milestone_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawMilestone::into_milestone).transpose()
  }

  async fn list_milestones(&self, user_id: &str) -> Result<Vec<Milestone>> {
    let user = user_id.to_owned();

    let raws: Vec<RawMilestone> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, user_id, title, description, start_date,
                  end_date, time, notify, notify_before_hours
           FROM milestones WHERE user_id = ?1 ORDER BY start_date, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], map_milestone_row)?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMilestone::into_milestone).collect()
  }

  async fn update_milestone(
    &self,
    user_id: &str,
    id: Uuid,
    input: NewMilestone,
  ) -> Result<Option<Milestone>> {
    input.validate()?;
    let input = input.sanitized();

    let id_str    = encode_uuid(id);
    let user      = user_id.to_owned();
    let title     = input.title.clone();
    let desc      = input.description.clone();
    let start_str = encode_date(input.start_date);
    let end_str   = input.end_date.map(encode_date);
    let time_str  = input.time.map(encode_time);
    let notify    = input.notify;
    let before    = input.notify_before_hours;

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE milestones
           SET title = ?3, description = ?4, start_date = ?5,
               end_date = ?6, time = ?7, notify = ?8, notify_before_hours = ?9
           WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![
            id_str, user, title, desc, start_str, end_str, time_str, notify,
            before,
          ],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.publish(user_id, Collection::Milestones, ChangeKind::Updated, id);
    Ok(Some(Milestone {
      id,
      title:       input.title,
      description: input.description,
      start_date:  input.start_date,
      end_date:    input.end_date,
      time:        input.time,
      notify:      input.notify,
      notify_before_hours: input.notify_before_hours,
      user_id:     user_id.to_owned(),
    }))
  }

  async fn delete_milestone(&self, user_id: &str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let user   = user_id.to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "DELETE FROM milestones WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(false);
    }
    self.publish(user_id, Collection::Milestones, ChangeKind::Deleted, id);
    Ok(true)
  }

  // ── Calendar links ────────────────────────────────────────────────────────

  async fn add_link(&self, input: NewCalendarLink) -> Result<CalendarLink> {
    input.validate()?;
    let link = CalendarLink {
      id:       Uuid::new_v4(),
      app_name: input.app_name,
      url:      input.url,
      user_id:  input.user_id,
    };

    let id_str   = encode_uuid(link.id);
    let user_id  = link.user_id.clone();
    let app_name = link.app_name.clone();
    let url      = link.url.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO calendar_links (id, user_id, app_name, url)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, user_id, app_name, url],
        )?;
        Ok(())
      })
      .await?;

    self.publish(&link.user_id, Collection::Links, ChangeKind::Created, link.id);
    Ok(link)
  }

  async fn get_link(&self, user_id: &str, id: Uuid) -> Result<Option<CalendarLink>> {
    let id_str = encode_uuid(id);
    let user   = user_id.to_owned();

    let raw: Option<RawCalendarLink> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT id, user_id, app_name, url
             FROM calendar_links WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id_str, user],
            |r| {
              Ok(RawCalendarLink {
                id:       r.get(0)?,
                user_id:  r.get(1)?,
                app_name: r.get(2)?,
                url:      r.get(3)?,
              })
            },
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawCalendarLink::into_link).transpose()
  }

  async fn list_links(&self, user_id: &str) -> Result<Vec<CalendarLink>> {
    let user = user_id.to_owned();

    let raws: Vec<RawCalendarLink> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, user_id, app_name, url
           FROM calendar_links WHERE user_id = ?1 ORDER BY app_name, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |r| {
            Ok(RawCalendarLink {
              id:       r.get(0)?,
              user_id:  r.get(1)?,
              app_name: r.get(2)?,
              url:      r.get(3)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCalendarLink::into_link).collect()
  }

  async fn update_link(
    &self,
    user_id: &str,
    id: Uuid,
    input: NewCalendarLink,
  ) -> Result<Option<CalendarLink>> {
    input.validate()?;

    let id_str   = encode_uuid(id);
    let user     = user_id.to_owned();
    let app_name = input.app_name.clone();
    let url      = input.url.clone();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE calendar_links SET app_name = ?3, url = ?4
           WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user, app_name, url],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.publish(user_id, Collection::Links, ChangeKind::Updated, id);
    Ok(Some(CalendarLink {
      id,
      app_name: input.app_name,
      url:      input.url,
      user_id:  user_id.to_owned(),
    }))
  }

  async fn delete_link(&self, user_id: &str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let user   = user_id.to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "DELETE FROM calendar_links WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(false);
    }
    self.publish(user_id, Collection::Links, ChangeKind::Deleted, id);
    Ok(true)
  }

  // ── Change feed ───────────────────────────────────────────────────────────

  fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
    self.events.subscribe()
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

fn map_milestone_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawMilestone> {
  Ok(RawMilestone {
    id:          r.get(0)?,
    user_id:     r.get(1)?,
    title:       r.get(2)?,
    description: r.get(3)?,
    start_date:  r.get(4)?,
    end_date:    r.get(5)?,
    time:        r.get(6)?,
    notify:      r.get(7)?,
    notify_before_hours: r.get(8)?,
  })
}
