//! Timestamp normalization.
//!
//! Source rows store timestamps as text in several layouts. Every layout is
//! reduced to one canonical, offset-free ISO-8601 rendering so the search
//! engine sees a single `date` format.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::error::DomainError;

/// A source timestamp layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `YYYY-MM-DDTHH:MM:SS.ffffffZ`
    IsoMicrosZulu,
    /// `YYYY-MM-DDTHH:MM:SS.ffffff`, fraction optional.
    IsoMicros,
    /// `YYYY-MM-DD HH:MM:SS`
    SpaceSeparated,
    /// `YYYY-MM-DD`, read as midnight.
    DateOnly,
}

impl TimestampFormat {
    /// All formats in priority order.
    pub const ALL: [Self; 4] = [
        Self::IsoMicrosZulu,
        Self::IsoMicros,
        Self::SpaceSeparated,
        Self::DateOnly,
    ];

    /// The `chrono` pattern for this layout.
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::IsoMicrosZulu => "%Y-%m-%dT%H:%M:%S%.fZ",
            Self::IsoMicros => "%Y-%m-%dT%H:%M:%S%.f",
            Self::SpaceSeparated => "%Y-%m-%d %H:%M:%S",
            Self::DateOnly => "%Y-%m-%d",
        }
    }

    fn parse(self, raw: &str) -> Option<NaiveDateTime> {
        match self {
            Self::DateOnly => NaiveDate::parse_from_str(raw, self.pattern())
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN)),
            _ => NaiveDateTime::parse_from_str(raw, self.pattern()).ok(),
        }
    }
}

/// A timestamp in canonical form, truncated to microseconds.
///
/// Renders as `YYYY-MM-DDTHH:MM:SS`, with a six-digit fraction appended only
/// when the sub-second part is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalTimestamp(NaiveDateTime);

impl CanonicalTimestamp {
    /// Wraps a date-time, dropping anything finer than a microsecond.
    ///
    /// A leap second (`:60`) is clamped to the preceding second, keeping its
    /// fraction.
    #[must_use]
    pub fn new(value: NaiveDateTime) -> Self {
        let micros_as_nanos = value.nanosecond() % 1_000_000_000 / 1_000 * 1_000;
        Self(value.with_nanosecond(micros_as_nanos).unwrap_or(value))
    }

    /// The underlying date-time.
    #[must_use]
    pub fn value(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))?;
        let micros = self.0.nanosecond() / 1_000;
        if micros != 0 {
            write!(f, ".{micros:06}")?;
        }
        Ok(())
    }
}

impl Serialize for CanonicalTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses timestamps against an ordered set of accepted formats.
#[derive(Debug, Clone)]
pub struct TimestampNormalizer {
    formats: Vec<TimestampFormat>,
}

impl Default for TimestampNormalizer {
    fn default() -> Self {
        Self::new(TimestampFormat::ALL.to_vec())
    }
}

impl TimestampNormalizer {
    /// Creates a normalizer that tries `formats` in the given order.
    #[must_use]
    pub fn new(formats: Vec<TimestampFormat>) -> Self {
        Self { formats }
    }

    /// Parses `raw` with the first format that accepts it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FormatMismatch` if no format matches.
    pub fn parse(&self, raw: &str) -> Result<CanonicalTimestamp, DomainError> {
        let trimmed = raw.trim();
        self.formats
            .iter()
            .find_map(|format| format.parse(trimmed))
            .map(CanonicalTimestamp::new)
            .ok_or_else(|| DomainError::FormatMismatch {
                value: raw.to_owned(),
            })
    }

    /// Parses `raw` and renders it in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FormatMismatch` if no format matches.
    pub fn normalize(&self, raw: &str) -> Result<String, DomainError> {
        self.parse(raw).map(|ts| ts.to_string())
    }
}
