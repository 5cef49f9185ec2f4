// src/storage/sqlite.rs

//! SQLite store implementation.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;
use crate::models::{EventDraft, EventRecord};
use crate::storage::EventPage;

/// Searchable columns; a closed set so user input never names a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Artists,
    Club,
}

impl SearchField {
    fn column(self) -> &'static str {
        match self {
            SearchField::Artists => "artists",
            SearchField::Club => "club_name",
        }
    }
}

/// SQLite-backed event store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the database at the given URL, creating file and schema
    /// as needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Connect to a private in-memory database. A single connection keeps
    /// the database alive and shared for the pool's lifetime.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_name TEXT NOT NULL,
                club_name TEXT NOT NULL,
                event_date DATE NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                artists TEXT NOT NULL,
                attending_count INTEGER NOT NULL DEFAULT 0,
                buy_link TEXT NOT NULL,
                source_link TEXT UNIQUE NOT NULL,
                flyer_image TEXT NOT NULL DEFAULT '',
                notified INTEGER NOT NULL DEFAULT 0,
                date_added TIMESTAMP NOT NULL
            );",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_event_date ON events(event_date);")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Look up an event by its stable upstream identity.
    pub async fn find_by_source_link(&self, source_link: &str) -> Result<Option<EventRecord>> {
        let record = sqlx::query_as("SELECT * FROM events WHERE source_link = ?")
            .bind(source_link)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// Insert a first-sighting event with `notified = false` and
    /// `date_added = now`. The UNIQUE constraint on `source_link` rejects
    /// duplicate identities.
    pub async fn insert(&self, draft: &EventDraft) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO events
                (event_name, club_name, event_date, start_time, end_time,
                 artists, attending_count, buy_link, source_link, flyer_image,
                 notified, date_added)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(&draft.event_name)
        .bind(&draft.club_name)
        .bind(draft.event_date)
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.artists)
        .bind(draft.attending_count)
        .bind(&draft.buy_link)
        .bind(&draft.source_link)
        .bind(&draft.flyer_image)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    /// Overwrite all mutable columns of the row keyed by the draft's
    /// `source_link`. Deliberately does not reference `notified` or
    /// `date_added`.
    pub async fn update(&self, draft: &EventDraft) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE events SET
                event_name = ?,
                club_name = ?,
                event_date = ?,
                start_time = ?,
                end_time = ?,
                artists = ?,
                attending_count = ?,
                buy_link = ?,
                flyer_image = ?
             WHERE source_link = ?",
        )
        .bind(&draft.event_name)
        .bind(&draft.club_name)
        .bind(draft.event_date)
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.artists)
        .bind(draft.attending_count)
        .bind(&draft.buy_link)
        .bind(&draft.flyer_image)
        .bind(&draft.source_link)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Events on or after `today`, soonest first.
    pub async fn upcoming(&self, today: NaiveDate, limit: i64, offset: i64) -> Result<EventPage> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE event_date >= ?")
            .bind(today)
            .fetch_one(&self.pool)
            .await?;

        let events = sqlx::query_as(
            "SELECT * FROM events
             WHERE event_date >= ?
             ORDER BY event_date ASC, start_time ASC
             LIMIT ? OFFSET ?",
        )
        .bind(today)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(EventPage { events, total })
    }

    /// Events with `event_date` inside the window, inclusive on both ends.
    pub async fn events_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<EventPage> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE event_date BETWEEN ? AND ?")
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?;

        let events = sqlx::query_as(
            "SELECT * FROM events
             WHERE event_date BETWEEN ? AND ?
             ORDER BY event_date ASC, start_time ASC
             LIMIT ? OFFSET ?",
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(EventPage { events, total })
    }

    /// Substring search over a whitelisted column, future events only.
    pub async fn search(
        &self,
        field: SearchField,
        query: &str,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<EventPage> {
        let pattern = format!("%{query}%");
        let column = field.column();

        let total = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM events WHERE {column} LIKE ? AND event_date >= ?"
        ))
        .bind(&pattern)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        let events = sqlx::query_as(&format!(
            "SELECT * FROM events
             WHERE {column} LIKE ? AND event_date >= ?
             ORDER BY event_date ASC, start_time ASC
             LIMIT ? OFFSET ?"
        ))
        .bind(&pattern)
        .bind(today)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(EventPage { events, total })
    }

    /// Events the notifier has not dispatched yet.
    pub async fn unnotified(&self) -> Result<Vec<EventRecord>> {
        let events = sqlx::query_as("SELECT * FROM events WHERE notified = 0")
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    /// Record a successful dispatch. Monotone: only ever sets the flag.
    pub async fn mark_notified(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE events SET notified = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
