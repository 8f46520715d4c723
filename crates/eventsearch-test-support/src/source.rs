//! Test record sources — mock `RecordSource` implementations for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use eventsearch_core::error::DomainError;
use eventsearch_core::source::{EventBatch, RecordSource, TicketRow};

/// A record source that serves fixed rows and counts how often it was read.
#[derive(Debug, Default)]
pub struct FixedRecordSource {
    events: Mutex<EventBatch>,
    tickets: Mutex<Vec<TicketRow>>,
    reads: AtomicUsize,
}

impl FixedRecordSource {
    /// Create a source serving `events` and `tickets`.
    #[must_use]
    pub fn new(events: EventBatch, tickets: Vec<TicketRow>) -> Self {
        Self {
            events: Mutex::new(events),
            tickets: Mutex::new(tickets),
            reads: AtomicUsize::new(0),
        }
    }

    /// Create a source that only serves event rows.
    #[must_use]
    pub fn with_events(events: EventBatch) -> Self {
        Self::new(events, Vec::new())
    }

    /// Create a source that only serves ticket rows.
    #[must_use]
    pub fn with_tickets(tickets: Vec<TicketRow>) -> Self {
        Self::new(EventBatch::default(), tickets)
    }

    /// Replaces the event rows served by later reads.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn replace_events(&self, events: EventBatch) {
        *self.events.lock().unwrap() = events;
    }

    /// Number of completed reads of either kind.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for FixedRecordSource {
    async fn read_event_batch(&self) -> Result<EventBatch, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.events.lock().unwrap().clone())
    }

    async fn read_ticket_rows(&self) -> Result<Vec<TicketRow>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.tickets.lock().unwrap().clone())
    }
}

/// A record source that always fails as if the database were unreachable.
#[derive(Debug)]
pub struct FailingRecordSource;

#[async_trait]
impl RecordSource for FailingRecordSource {
    async fn read_event_batch(&self) -> Result<EventBatch, DomainError> {
        Err(DomainError::StorageUnavailable("unable to open database file".into()))
    }

    async fn read_ticket_rows(&self) -> Result<Vec<TicketRow>, DomainError> {
        Err(DomainError::StorageUnavailable("unable to open database file".into()))
    }
}
