//! `SQLite` implementation of the `RecordSource` trait.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, instrument};

use eventsearch_core::error::DomainError;
use eventsearch_core::source::{
    ArtistRow, EventBatch, EventRow, RecordSource, ScheduleRow, TicketRow,
};

use crate::queries;

#[derive(sqlx::FromRow)]
struct EventRecord {
    id: i64,
    name: String,
    description: Option<String>,
    category: Option<String>,
    ticket_open_time: String,
    running_time: Option<i64>,
}

impl From<EventRecord> for EventRow {
    fn from(r: EventRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            ticket_open_time: r.ticket_open_time,
            running_time: r.running_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScheduleRecord {
    id: i64,
    event_id: i64,
    start_time: String,
    end_time: String,
    sub_venue_id: Option<i64>,
    sub_venue_name: Option<String>,
    capacity: Option<i64>,
    venue_id: Option<i64>,
    venue_name: Option<String>,
    location: Option<String>,
}

impl From<ScheduleRecord> for ScheduleRow {
    fn from(r: ScheduleRecord) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            start_time: r.start_time,
            end_time: r.end_time,
            sub_venue_id: r.sub_venue_id,
            sub_venue_name: r.sub_venue_name,
            capacity: r.capacity,
            venue_id: r.venue_id,
            venue_name: r.venue_name,
            location: r.location,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArtistRecord {
    id: i64,
    event_schedule_id: i64,
    name: Option<String>,
    company_name: Option<String>,
}

impl From<ArtistRecord> for ArtistRow {
    fn from(r: ArtistRecord) -> Self {
        Self {
            id: r.id,
            event_schedule_id: r.event_schedule_id,
            name: r.name,
            company_name: r.company_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRecord {
    id: i64,
    book_date: String,
    user_id: Option<i64>,
    user_name: Option<String>,
    email: Option<String>,
    schedule_id: Option<i64>,
    event_name: Option<String>,
    event_category: Option<String>,
    class: Option<String>,
    price: Option<f64>,
    row_number: Option<i64>,
    column_number: Option<i64>,
}

impl From<TicketRecord> for TicketRow {
    fn from(r: TicketRecord) -> Self {
        Self {
            id: r.id,
            book_date: r.book_date,
            user_id: r.user_id,
            user_name: r.user_name,
            email: r.email,
            schedule_id: r.schedule_id,
            event_name: r.event_name,
            event_category: r.event_category,
            class: r.class,
            price: r.price,
            row_number: r.row_number,
            column_number: r.column_number,
        }
    }
}

/// How long the pooled connection may sit idle after a read before it is
/// closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(1);

fn storage_error(err: sqlx::Error) -> DomainError {
    DomainError::StorageUnavailable(err.to_string())
}

/// SQLite-backed record source.
///
/// Every read acquires one connection from the pool, runs all of its
/// queries on it, and returns it when done.
#[derive(Debug, Clone)]
pub struct SqliteRecordSource {
    pool: SqlitePool,
}

impl SqliteRecordSource {
    /// Creates a new `SqliteRecordSource`.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a read-only, single-connection pool for `database_url`.
    /// The connection is made lazily on the first read and closed shortly
    /// after a read releases it.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the URL cannot be parsed.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let options: SqliteConnectOptions = database_url.parse()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(0)
            .idle_timeout(IDLE_TIMEOUT)
            .connect_lazy_with(options.read_only(true));
        Ok(Self::new(pool))
    }

    async fn connection(&self) -> Result<PoolConnection<Sqlite>, DomainError> {
        self.pool.acquire().await.map_err(storage_error)
    }
}

#[async_trait]
impl RecordSource for SqliteRecordSource {
    #[instrument(skip(self))]
    async fn read_event_batch(&self) -> Result<EventBatch, DomainError> {
        let mut conn = self.connection().await?;

        let events: Vec<EventRecord> = sqlx::query_as(queries::SELECT_EVENTS)
            .fetch_all(&mut *conn)
            .await
            .map_err(storage_error)?;
        let schedules: Vec<ScheduleRecord> = sqlx::query_as(queries::SELECT_SCHEDULES)
            .fetch_all(&mut *conn)
            .await
            .map_err(storage_error)?;
        let artists: Vec<ArtistRecord> = sqlx::query_as(queries::SELECT_ARTISTS)
            .fetch_all(&mut *conn)
            .await
            .map_err(storage_error)?;

        debug!(
            events = events.len(),
            schedules = schedules.len(),
            artists = artists.len(),
            "loaded event batch"
        );

        Ok(EventBatch {
            events: events.into_iter().map(EventRow::from).collect(),
            schedules: schedules.into_iter().map(ScheduleRow::from).collect(),
            artists: artists.into_iter().map(ArtistRow::from).collect(),
        })
    }

    #[instrument(skip(self))]
    async fn read_ticket_rows(&self) -> Result<Vec<TicketRow>, DomainError> {
        let mut conn = self.connection().await?;

        let tickets: Vec<TicketRecord> = sqlx::query_as(queries::SELECT_TICKETS)
            .fetch_all(&mut *conn)
            .await
            .map_err(storage_error)?;

        debug!(tickets = tickets.len(), "loaded ticket rows");
        Ok(tickets.into_iter().map(TicketRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_lazy_uses_one_short_lived_connection() {
        let source = SqliteRecordSource::connect_lazy("sqlite::memory:").unwrap();

        let options = source.pool.options();
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 0);
        assert_eq!(options.get_idle_timeout(), Some(IDLE_TIMEOUT));
        assert_eq!(source.pool.size(), 0);
    }
}
