//! Schema mapper: relational rows to search documents.
//!
//! Everything here is pure. Rows are borrowed and new documents are built;
//! timestamps go through the `TimestampNormalizer`. A row whose timestamp does
//! not parse is reported as a `SkippedRow` instead of failing the batch.

use std::collections::HashMap;
use std::hash::Hash;

use eventsearch_core::error::DomainError;
use eventsearch_core::source::{ArtistRow, EventBatch, EventRow, ScheduleRow, TicketRow};
use eventsearch_core::timestamp::TimestampNormalizer;
use serde::Serialize;

use crate::domain::documents::{
    ArtistEntry, EventDocument, EventScheduleRef, ScheduleEntry, SeatRef, SubVenueRef,
    TicketDocument, UserRef, VenueRef,
};

/// A source row left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Source table of the row.
    pub entity: &'static str,
    /// Primary key of the row.
    pub row_id: i64,
    /// Why the row was skipped.
    pub reason: String,
}

impl SkippedRow {
    pub(crate) fn new(entity: &'static str, row_id: i64, err: &DomainError) -> Self {
        Self {
            entity,
            row_id,
            reason: err.to_string(),
        }
    }
}

/// A mapped document together with the child rows dropped while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<T> {
    /// The document.
    pub document: T,
    /// Child rows that were skipped.
    pub skipped: Vec<SkippedRow>,
}

/// Groups rows by key, keeping input order within each group.
pub fn group_by<K, T, F>(rows: impl IntoIterator<Item = T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

fn map_schedule(
    schedule: &ScheduleRow,
    artists: &[ArtistRow],
    normalizer: &TimestampNormalizer,
) -> Result<ScheduleEntry, SkippedRow> {
    let parse = |raw: &str| {
        normalizer
            .parse(raw)
            .map_err(|e| SkippedRow::new("EventSchedule", schedule.id, &e))
    };
    let start_time = parse(&schedule.start_time)?;
    let end_time = parse(&schedule.end_time)?;

    let mut artists: Vec<&ArtistRow> = artists.iter().collect();
    artists.sort_by_key(|a| a.id);

    Ok(ScheduleEntry {
        schedule_id: schedule.id,
        start_time,
        end_time,
        artists: artists
            .into_iter()
            .map(|a| ArtistEntry {
                artist_id: a.id,
                name: a.name.clone(),
                company_name: a.company_name.clone(),
            })
            .collect(),
    })
}

/// Builds the document for one event.
///
/// Venue and sub-venue come from the lowest-id schedule that joined to a
/// sub-venue; both stay empty when none did.
///
/// # Errors
///
/// Returns the event as a `SkippedRow` when its `ticket_open_time` does not
/// normalize. Schedules with bad timestamps are dropped and listed in
/// `Mapped::skipped`.
pub fn map_event(
    event: &EventRow,
    schedules: &[ScheduleRow],
    artists_by_schedule: &HashMap<i64, Vec<ArtistRow>>,
    normalizer: &TimestampNormalizer,
) -> Result<Mapped<EventDocument>, SkippedRow> {
    let ticket_open_time = normalizer
        .parse(&event.ticket_open_time)
        .map_err(|e| SkippedRow::new("Event", event.id, &e))?;

    let mut ordered: Vec<&ScheduleRow> = schedules.iter().collect();
    ordered.sort_by_key(|s| s.id);

    let (venue, sub_venue) = ordered
        .iter()
        .find(|s| s.sub_venue_id.is_some())
        .map(|s| {
            (
                VenueRef {
                    venue_id: s.venue_id,
                    name: s.venue_name.clone(),
                    location: s.location.clone(),
                },
                SubVenueRef {
                    sub_venue_id: s.sub_venue_id,
                    name: s.sub_venue_name.clone(),
                    capacity: s.capacity,
                },
            )
        })
        .unwrap_or_default();

    let mut entries = Vec::with_capacity(ordered.len());
    let mut skipped = Vec::new();
    for schedule in ordered {
        let artists = artists_by_schedule
            .get(&schedule.id)
            .map_or(&[][..], Vec::as_slice);
        match map_schedule(schedule, artists, normalizer) {
            Ok(entry) => entries.push(entry),
            Err(row) => skipped.push(row),
        }
    }

    Ok(Mapped {
        document: EventDocument {
            event_id: event.id,
            name: event.name.clone(),
            description: event.description.clone(),
            category: event.category.clone(),
            ticket_open_time,
            running_time: event.running_time,
            venue,
            sub_venue,
            schedules: entries,
        },
        skipped,
    })
}

/// Builds the document for one ticket.
///
/// # Errors
///
/// Returns the ticket as a `SkippedRow` when its `book_date` does not
/// normalize.
pub fn map_ticket(
    ticket: &TicketRow,
    normalizer: &TimestampNormalizer,
) -> Result<TicketDocument, SkippedRow> {
    let book_date = normalizer
        .parse(&ticket.book_date)
        .map_err(|e| SkippedRow::new("Ticket", ticket.id, &e))?;

    Ok(TicketDocument {
        ticket_id: ticket.id,
        book_date,
        user: UserRef {
            user_id: ticket.user_id,
            name: ticket.user_name.clone(),
            email: ticket.email.clone(),
        },
        event_schedule: EventScheduleRef {
            schedule_id: ticket.schedule_id,
            event_name: ticket.event_name.clone(),
            event_category: ticket.event_category.clone(),
        },
        seat: SeatRef {
            class: ticket.class.clone(),
            price: ticket.price,
            row_number: ticket.row_number,
            column_number: ticket.column_number,
        },
    })
}

/// Groups a full event batch by foreign key and maps every event.
///
/// Returns documents in event order plus every skipped row, events and
/// schedules alike.
pub fn map_event_batch(
    batch: &EventBatch,
    normalizer: &TimestampNormalizer,
) -> (Vec<EventDocument>, Vec<SkippedRow>) {
    let schedules_by_event = group_by(batch.schedules.iter().cloned(), |s| s.event_id);
    let artists_by_schedule = group_by(batch.artists.iter().cloned(), |a| a.event_schedule_id);

    let mut documents = Vec::with_capacity(batch.events.len());
    let mut skipped = Vec::new();
    for event in &batch.events {
        let schedules = schedules_by_event
            .get(&event.id)
            .map_or(&[][..], Vec::as_slice);
        match map_event(event, schedules, &artists_by_schedule, normalizer) {
            Ok(mapped) => {
                documents.push(mapped.document);
                skipped.extend(mapped.skipped);
            }
            Err(row) => skipped.push(row),
        }
    }
    (documents, skipped)
}
