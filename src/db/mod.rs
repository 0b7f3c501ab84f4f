use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite};
use std::env;
use std::str::FromStr;

use crate::error::Result;
use crate::models::{Event, EventStatus, Respondent, Response, Timeframe, TimeframeType};

/// Storage handle for events and everything hanging off them. Injected into
/// the workflows; the core generator/aggregator never see it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database named by `DATABASE_URL`, falling back to a local
    /// file, creating it on first run.
    pub async fn new() -> Result<Self> {
        let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:whenabouts.db".to_string());

        if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
            Sqlite::create_database(&db_url).await?;
        }

        Self::connect(&db_url).await
    }

    pub async fn connect(db_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Throwaway in-memory database. A single connection keeps every query
    /// on the same memory store.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                event_id TEXT PRIMARY KEY,
                creator_name TEXT NOT NULL,
                creator_email TEXT,
                title TEXT NOT NULL,
                description TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                timeframe_type TEXT NOT NULL,
                share_code TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active'
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS timeframes (
                timeframe_id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                label TEXT NOT NULL,
                response_count INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(event_id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS respondents (
                respondent_id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT,
                first_responded_at TEXT NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(event_id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                event_id TEXT NOT NULL,
                respondent_id TEXT NOT NULL,
                respondent_name TEXT NOT NULL,
                timeframe_id TEXT NOT NULL,
                availability TEXT NOT NULL,
                responded_at TEXT NOT NULL,
                PRIMARY KEY (event_id, respondent_id, timeframe_id),
                FOREIGN KEY (event_id) REFERENCES events(event_id) ON DELETE CASCADE,
                FOREIGN KEY (timeframe_id) REFERENCES timeframes(timeframe_id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Persists a new event together with its generated timeframes in one
    /// transaction, so a half-created event is never visible.
    pub async fn create_event(&self, event: &Event, timeframes: &[Timeframe]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO events (event_id, creator_name, creator_email, title, description,
                                start_date, end_date, timeframe_type, share_code, created_at, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.event_id)
        .bind(&event.creator_name)
        .bind(&event.creator_email)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date.to_rfc3339())
        .bind(event.end_date.to_rfc3339())
        .bind(event.timeframe_type.as_str())
        .bind(&event.share_code)
        .bind(event.created_at.to_rfc3339())
        .bind(event.status.as_str())
        .execute(&mut *tx)
        .await?;

        for (i, timeframe) in timeframes.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO timeframes (timeframe_id, event_id, start_date, end_date, label,
                                        response_count, position)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&timeframe.timeframe_id)
            .bind(&timeframe.event_id)
            .bind(timeframe.start_date.to_rfc3339())
            .bind(timeframe.end_date.to_rfc3339())
            .bind(&timeframe.label)
            .bind(timeframe.response_count)
            .bind(i as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            SELECT event_id, creator_name, creator_email, title, description,
                   start_date, end_date, timeframe_type, share_code, created_at, status
            FROM events
            WHERE event_id = ?
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| event_from_row(&r)).transpose()
    }

    /// Alternate-key lookup; share codes are stored uppercase.
    pub async fn get_event_by_share_code(&self, share_code: &str) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            SELECT event_id, creator_name, creator_email, title, description,
                   start_date, end_date, timeframe_type, share_code, created_at, status
            FROM events
            WHERE share_code = ?
            "#,
        )
        .bind(share_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| event_from_row(&r)).transpose()
    }

    pub async fn share_code_exists(&self, share_code: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM events WHERE share_code = ?")
            .bind(share_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// All timeframes for an event, in generation (chronological) order.
    pub async fn get_timeframes(&self, event_id: &str) -> Result<Vec<Timeframe>> {
        let rows = sqlx::query(
            r#"
            SELECT timeframe_id, event_id, start_date, end_date, label, response_count
            FROM timeframes
            WHERE event_id = ?
            ORDER BY position
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut timeframes = Vec::with_capacity(rows.len());
        for row in rows {
            timeframes.push(timeframe_from_row(&row)?);
        }
        Ok(timeframes)
    }

    pub async fn insert_respondent(&self, respondent: &Respondent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO respondents (respondent_id, event_id, name, email, first_responded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&respondent.respondent_id)
        .bind(&respondent.event_id)
        .bind(&respondent.name)
        .bind(&respondent.email)
        .bind(respondent.first_responded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_respondent(
        &self,
        event_id: &str,
        respondent_id: &str,
    ) -> Result<Option<Respondent>> {
        let row = sqlx::query(
            r#"
            SELECT respondent_id, event_id, name, email, first_responded_at
            FROM respondents
            WHERE event_id = ? AND respondent_id = ?
            "#,
        )
        .bind(event_id)
        .bind(respondent_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| respondent_from_row(&r)).transpose()
    }

    pub async fn get_respondents(&self, event_id: &str) -> Result<Vec<Respondent>> {
        let rows = sqlx::query(
            r#"
            SELECT respondent_id, event_id, name, email, first_responded_at
            FROM respondents
            WHERE event_id = ?
            ORDER BY first_responded_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut respondents = Vec::with_capacity(rows.len());
        for row in rows {
            respondents.push(respondent_from_row(&row)?);
        }
        Ok(respondents)
    }

    /// Saves a vote, replacing any earlier vote by the same respondent on
    /// the same timeframe. Last write wins per (respondent, timeframe).
    pub async fn save_response(&self, response: &Response) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO responses (event_id, respondent_id, respondent_name, timeframe_id,
                                   availability, responded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(event_id, respondent_id, timeframe_id)
            DO UPDATE SET respondent_name = excluded.respondent_name,
                          availability = excluded.availability,
                          responded_at = excluded.responded_at
            "#,
        )
        .bind(&response.event_id)
        .bind(&response.respondent_id)
        .bind(&response.respondent_name)
        .bind(&response.timeframe_id)
        .bind(response.availability.as_str())
        .bind(response.responded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_responses(&self, event_id: &str) -> Result<Vec<Response>> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, respondent_id, respondent_name, timeframe_id, availability, responded_at
            FROM responses
            WHERE event_id = ?
            ORDER BY responded_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            responses.push(response_from_row(&row)?);
        }
        Ok(responses)
    }

    pub async fn get_respondent_responses(
        &self,
        event_id: &str,
        respondent_id: &str,
    ) -> Result<Vec<Response>> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, respondent_id, respondent_name, timeframe_id, availability, responded_at
            FROM responses
            WHERE event_id = ? AND respondent_id = ?
            "#,
        )
        .bind(event_id)
        .bind(respondent_id)
        .fetch_all(&self.pool)
        .await?;

        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            responses.push(response_from_row(&row)?);
        }
        Ok(responses)
    }

    pub async fn set_event_status(&self, event_id: &str, status: EventStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET status = ?
            WHERE event_id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Marks active events whose date range has fully passed as expired.
    /// Returns how many were flipped.
    pub async fn expire_events(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = 'expired'
            WHERE status = 'active' AND end_date < ?
            "#,
        )
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    Ok(Event {
        event_id: row.get("event_id"),
        creator_name: row.get("creator_name"),
        creator_email: row.get("creator_email"),
        title: row.get("title"),
        description: row.get("description"),
        start_date: parse_timestamp(&row.get::<String, _>("start_date"))?,
        end_date: parse_timestamp(&row.get::<String, _>("end_date"))?,
        timeframe_type: TimeframeType::from_str(&row.get::<String, _>("timeframe_type"))?,
        share_code: row.get("share_code"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        status: EventStatus::from_str(&row.get::<String, _>("status"))?,
    })
}

fn timeframe_from_row(row: &SqliteRow) -> Result<Timeframe> {
    Ok(Timeframe {
        timeframe_id: row.get("timeframe_id"),
        event_id: row.get("event_id"),
        start_date: parse_timestamp(&row.get::<String, _>("start_date"))?,
        end_date: parse_timestamp(&row.get::<String, _>("end_date"))?,
        label: row.get("label"),
        response_count: row.get("response_count"),
    })
}

fn respondent_from_row(row: &SqliteRow) -> Result<Respondent> {
    Ok(Respondent {
        respondent_id: row.get("respondent_id"),
        event_id: row.get("event_id"),
        name: row.get("name"),
        email: row.get("email"),
        first_responded_at: parse_timestamp(&row.get::<String, _>("first_responded_at"))?,
    })
}

fn response_from_row(row: &SqliteRow) -> Result<Response> {
    Ok(Response {
        event_id: row.get("event_id"),
        respondent_id: row.get("respondent_id"),
        respondent_name: row.get("respondent_name"),
        timeframe_id: row.get("timeframe_id"),
        availability: crate::models::Availability::from_str(
            &row.get::<String, _>("availability"),
        )?,
        responded_at: parse_timestamp(&row.get::<String, _>("responded_at"))?,
    })
}
