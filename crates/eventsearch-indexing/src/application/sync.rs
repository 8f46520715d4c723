//! Full-refresh sync orchestration.
//!
//! Each run reads one document type from the record source in a single
//! batch, maps it, and upserts every document by natural id. Rows that fail
//! to map, and documents the engine rejects, are skipped and reported; a
//! read failure or an unreachable engine aborts the run. Re-running a run
//! that aborted part-way simply resumes, since upserts overwrite.

use std::fmt;
use std::sync::Arc;

use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use eventsearch_core::source::RecordSource;
use eventsearch_core::timestamp::TimestampNormalizer;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{Span, field, info, instrument, warn};
use uuid::Uuid;

use crate::domain::documents::SearchDocument;
use crate::domain::mapper::{self, SkippedRow};

/// Kind of document a sync run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// Event documents.
    Events,
    /// Ticket documents.
    Tickets,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events => f.write_str("events"),
            Self::Tickets => f.write_str("tickets"),
        }
    }
}

/// Outcome of one completed sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Identifier of the run, also recorded on its tracing span.
    pub run_id: Uuid,
    /// Kind of documents synced.
    pub document_type: DocumentType,
    /// Number of documents upserted.
    pub indexed: usize,
    /// Rows left out of the index.
    pub skipped: Vec<SkippedRow>,
}

impl SyncReport {
    /// Returns `true` if no row was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Single-flight guard for sync runs.
///
/// Two overlapping full syncs would race on the same document ids, so a run
/// must hold a `SyncPermit` for its whole duration.
#[derive(Debug, Clone, Default)]
pub struct SyncGuard {
    running: Arc<Mutex<()>>,
}

/// Proof that the holder is the only running sync. Released on drop.
#[derive(Debug)]
pub struct SyncPermit {
    _guard: OwnedMutexGuard<()>,
}

impl SyncGuard {
    /// Creates an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard without waiting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SyncInProgress` if another run holds it.
    pub fn try_begin(&self) -> Result<SyncPermit, DomainError> {
        Arc::clone(&self.running)
            .try_lock_owned()
            .map(|guard| SyncPermit { _guard: guard })
            .map_err(|_| DomainError::SyncInProgress)
    }
}

async fn upsert_all<D: SearchDocument>(
    engine: &dyn SearchEngine,
    index: &str,
    documents: &[D],
    skipped: &mut Vec<SkippedRow>,
) -> Result<usize, DomainError> {
    let mut indexed = 0;
    for document in documents {
        let body = serde_json::to_value(document).map_err(|e| {
            DomainError::Infrastructure(format!("document serialization failed: {e}"))
        })?;
        match engine.upsert(index, &document.document_id(), &body).await {
            Ok(_) => indexed += 1,
            Err(e) if e.is_row_scoped() => {
                skipped.push(SkippedRow::new(D::ENTITY, document.row_id(), &e));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(indexed)
}

fn finish(
    document_type: DocumentType,
    run_id: Uuid,
    indexed: usize,
    skipped: Vec<SkippedRow>,
) -> SyncReport {
    for row in &skipped {
        warn!(entity = row.entity, row_id = row.row_id, reason = %row.reason, "skipped row");
    }
    info!(indexed, skipped = skipped.len(), "sync finished");
    SyncReport {
        run_id,
        document_type,
        indexed,
        skipped,
    }
}

/// Regenerates and upserts every event document.
///
/// # Errors
///
/// Returns `DomainError::StorageUnavailable` if the batch read fails and
/// `DomainError::IndexUnavailable` if the engine goes away mid-run.
#[instrument(skip(source, engine, normalizer), fields(run_id = tracing::field::Empty))]
pub async fn sync_events(
    source: &dyn RecordSource,
    engine: &dyn SearchEngine,
    index: &str,
    normalizer: &TimestampNormalizer,
) -> Result<SyncReport, DomainError> {
    let run_id = Uuid::now_v7();
    Span::current().record("run_id", field::display(run_id));

    let batch = source.read_event_batch().await?;
    info!(
        events = batch.events.len(),
        schedules = batch.schedules.len(),
        artists = batch.artists.len(),
        "read event batch"
    );

    let (documents, mut skipped) = mapper::map_event_batch(&batch, normalizer);
    let indexed = upsert_all(engine, index, &documents, &mut skipped).await?;

    Ok(finish(DocumentType::Events, run_id, indexed, skipped))
}

/// Regenerates and upserts every ticket document.
///
/// # Errors
///
/// Returns `DomainError::StorageUnavailable` if the batch read fails and
/// `DomainError::IndexUnavailable` if the engine goes away mid-run.
#[instrument(skip(source, engine, normalizer), fields(run_id = tracing::field::Empty))]
pub async fn sync_tickets(
    source: &dyn RecordSource,
    engine: &dyn SearchEngine,
    index: &str,
    normalizer: &TimestampNormalizer,
) -> Result<SyncReport, DomainError> {
    let run_id = Uuid::now_v7();
    Span::current().record("run_id", field::display(run_id));

    let rows = source.read_ticket_rows().await?;
    info!(tickets = rows.len(), "read ticket rows");

    let mut documents = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    for row in &rows {
        match mapper::map_ticket(row, normalizer) {
            Ok(document) => documents.push(document),
            Err(row) => skipped.push(row),
        }
    }
    let indexed = upsert_all(engine, index, &documents, &mut skipped).await?;

    Ok(finish(DocumentType::Tickets, run_id, indexed, skipped))
}

/// Owns the collaborators and index names needed to run syncs.
pub struct SyncService {
    source: Arc<dyn RecordSource>,
    engine: Arc<dyn SearchEngine>,
    normalizer: TimestampNormalizer,
    events_index: String,
    tickets_index: String,
    guard: SyncGuard,
}

impl fmt::Debug for SyncService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncService")
            .field("events_index", &self.events_index)
            .field("tickets_index", &self.tickets_index)
            .finish_non_exhaustive()
    }
}

impl SyncService {
    /// Creates a service syncing into `events_index` and `tickets_index`.
    #[must_use]
    pub fn new(
        source: Arc<dyn RecordSource>,
        engine: Arc<dyn SearchEngine>,
        events_index: impl Into<String>,
        tickets_index: impl Into<String>,
    ) -> Self {
        Self {
            source,
            engine,
            normalizer: TimestampNormalizer::default(),
            events_index: events_index.into(),
            tickets_index: tickets_index.into(),
            guard: SyncGuard::new(),
        }
    }

    /// Syncs event documents.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SyncInProgress` if another run is active, or any
    /// error from `sync_events`.
    pub async fn sync_events(&self) -> Result<SyncReport, DomainError> {
        let _permit = self.guard.try_begin()?;
        sync_events(
            &*self.source,
            &*self.engine,
            &self.events_index,
            &self.normalizer,
        )
        .await
    }

    /// Syncs ticket documents.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SyncInProgress` if another run is active, or any
    /// error from `sync_tickets`.
    pub async fn sync_tickets(&self) -> Result<SyncReport, DomainError> {
        let _permit = self.guard.try_begin()?;
        sync_tickets(
            &*self.source,
            &*self.engine,
            &self.tickets_index,
            &self.normalizer,
        )
        .await
    }

    /// Syncs events, then tickets, under one permit.
    ///
    /// # Errors
    ///
    /// Returns the first error; tickets are not synced if events fail.
    pub async fn sync_all(&self) -> Result<Vec<SyncReport>, DomainError> {
        let _permit = self.guard.try_begin()?;
        let events = sync_events(
            &*self.source,
            &*self.engine,
            &self.events_index,
            &self.normalizer,
        )
        .await?;
        let tickets = sync_tickets(
            &*self.source,
            &*self.engine,
            &self.tickets_index,
            &self.normalizer,
        )
        .await?;
        Ok(vec![events, tickets])
    }

    /// The guard shared by every run of this service.
    #[must_use]
    pub fn guard(&self) -> &SyncGuard {
        &self.guard
    }
}
