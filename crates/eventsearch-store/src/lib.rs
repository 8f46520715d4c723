//! Event Search Store — SQLite-backed `RecordSource`.

pub mod queries;
pub mod sqlite_record_source;
