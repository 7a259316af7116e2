//! The calendar event value type shared by the decoder and encoder.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single blocking event parsed from or written to a calendar feed.
///
/// Dates carry checkout semantics: `end` is the day the property frees up
/// again, not the last blocked night. An event spanning a single night has
/// `end == start + 1 day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcalEvent {
    /// Stable identifier. Comes from the feed's UID line when present,
    /// otherwise derived from a hash of the event's fields.
    pub uid: String,
    /// DTSTAMP: when the source produced the event, if it said.
    pub created: Option<DateTime<Utc>>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub summary: String,
    pub description: String,
}
