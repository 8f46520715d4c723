//! Relational record source abstraction.
//!
//! Each row type matches one batched query against the source schema. Joined
//! columns are optional because the joins are outer joins.

use async_trait::async_trait;

use crate::error::DomainError;

/// One `Event` row.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    /// Event primary key.
    pub id: i64,
    /// Event name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Event category.
    pub category: Option<String>,
    /// Raw ticket-open timestamp as stored.
    pub ticket_open_time: String,
    /// Running time in minutes.
    pub running_time: Option<i64>,
}

/// One `EventSchedule` row joined with its sub-venue and venue.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// Schedule primary key.
    pub id: i64,
    /// Owning event.
    pub event_id: i64,
    /// Raw start timestamp.
    pub start_time: String,
    /// Raw end timestamp.
    pub end_time: String,
    /// Joined sub-venue id.
    pub sub_venue_id: Option<i64>,
    /// Joined sub-venue name.
    pub sub_venue_name: Option<String>,
    /// Joined sub-venue capacity.
    pub capacity: Option<i64>,
    /// Joined venue id.
    pub venue_id: Option<i64>,
    /// Joined venue name.
    pub venue_name: Option<String>,
    /// Joined venue location.
    pub location: Option<String>,
}

/// One `Artist` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    /// Artist primary key.
    pub id: i64,
    /// Owning schedule.
    pub event_schedule_id: i64,
    /// Artist name.
    pub name: Option<String>,
    /// Agency or label.
    pub company_name: Option<String>,
}

/// One `Ticket` row joined with its user, schedule, event, and seat section.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRow {
    /// Ticket primary key.
    pub id: i64,
    /// Raw booking timestamp.
    pub book_date: String,
    /// Joined user id.
    pub user_id: Option<i64>,
    /// Joined user name.
    pub user_name: Option<String>,
    /// Joined user email.
    pub email: Option<String>,
    /// Joined schedule id.
    pub schedule_id: Option<i64>,
    /// Name of the event the schedule belongs to.
    pub event_name: Option<String>,
    /// Category of the event the schedule belongs to.
    pub event_category: Option<String>,
    /// Seat section class.
    pub class: Option<String>,
    /// Seat section price.
    pub price: Option<f64>,
    /// Seat row.
    pub row_number: Option<i64>,
    /// Seat column.
    pub column_number: Option<i64>,
}

/// Every row needed to assemble event documents, read in one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    /// All events, ordered by id.
    pub events: Vec<EventRow>,
    /// All schedules, ordered by event id then schedule id.
    pub schedules: Vec<ScheduleRow>,
    /// All artists, ordered by schedule id then artist id.
    pub artists: Vec<ArtistRow>,
}

/// Read-only access to the relational source of truth.
///
/// Each method reads one document type in full over a connection that is
/// held for the duration of the call and released afterwards.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Reads events, schedules, and artists with one query per level.
    async fn read_event_batch(&self) -> Result<EventBatch, DomainError>;

    /// Reads every ticket with its joined user, schedule, and seat.
    async fn read_ticket_rows(&self) -> Result<Vec<TicketRow>, DomainError>;
}
