//! Denormalized search documents.

use eventsearch_core::timestamp::CanonicalTimestamp;
use serde::Serialize;

/// A document that is stored under the natural id of its source row.
pub trait SearchDocument: Serialize {
    /// Source table the document is built from.
    const ENTITY: &'static str;

    /// Primary key of the source row.
    fn row_id(&self) -> i64;

    /// Returns the id the document is upserted under.
    fn document_id(&self) -> String {
        self.row_id().to_string()
    }
}

/// Venue embedded in an event document. Fields are `None` when the event has
/// no schedule joined to a venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VenueRef {
    /// Venue id.
    pub venue_id: Option<i64>,
    /// Venue name.
    pub name: Option<String>,
    /// Venue location.
    pub location: Option<String>,
}

/// Sub-venue embedded in an event document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubVenueRef {
    /// Sub-venue id.
    pub sub_venue_id: Option<i64>,
    /// Sub-venue name.
    pub name: Option<String>,
    /// Seating capacity.
    pub capacity: Option<i64>,
}

/// Artist performing in a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistEntry {
    /// Artist id.
    pub artist_id: i64,
    /// Artist name.
    pub name: Option<String>,
    /// Agency or label.
    pub company_name: Option<String>,
}

/// One scheduled performance of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// Schedule id.
    pub schedule_id: i64,
    /// Canonical start time.
    pub start_time: CanonicalTimestamp,
    /// Canonical end time.
    pub end_time: CanonicalTimestamp,
    /// Performing artists, possibly empty.
    pub artists: Vec<ArtistEntry>,
}

/// Search document for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDocument {
    /// Event id, also the document id.
    pub event_id: i64,
    /// Event name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Event category.
    pub category: Option<String>,
    /// Canonical ticket-open time.
    pub ticket_open_time: CanonicalTimestamp,
    /// Running time in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_time: Option<i64>,
    /// Venue of the first joined schedule.
    pub venue: VenueRef,
    /// Sub-venue of the first joined schedule.
    pub sub_venue: SubVenueRef,
    /// Schedules ordered by id.
    pub schedules: Vec<ScheduleEntry>,
}

impl SearchDocument for EventDocument {
    const ENTITY: &'static str = "Event";

    fn row_id(&self) -> i64 {
        self.event_id
    }
}

/// Ticket holder embedded in a ticket document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserRef {
    /// User id.
    pub user_id: Option<i64>,
    /// User name.
    pub name: Option<String>,
    /// User email.
    pub email: Option<String>,
}

/// Schedule the ticket was booked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventScheduleRef {
    /// Schedule id.
    pub schedule_id: Option<i64>,
    /// Name of the scheduled event.
    pub event_name: Option<String>,
    /// Category of the scheduled event.
    pub event_category: Option<String>,
}

/// Seat section the ticket belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeatRef {
    /// Section class.
    pub class: Option<String>,
    /// Section price.
    pub price: Option<f64>,
    /// Seat row.
    pub row_number: Option<i64>,
    /// Seat column.
    pub column_number: Option<i64>,
}

/// Search document for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDocument {
    /// Ticket id, also the document id.
    pub ticket_id: i64,
    /// Canonical booking time.
    pub book_date: CanonicalTimestamp,
    /// Ticket holder.
    pub user: UserRef,
    /// Booked schedule.
    pub event_schedule: EventScheduleRef,
    /// Seat section.
    pub seat: SeatRef,
}

impl SearchDocument for TicketDocument {
    const ENTITY: &'static str = "Ticket";

    fn row_id(&self) -> i64 {
        self.ticket_id
    }
}
