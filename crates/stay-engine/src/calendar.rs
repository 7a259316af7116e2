//! Calendar store: the single source of truth for "is this range free".
//!
//! Holds normalized blocking events from every source -- direct
//! reservations and events imported from external channel feeds -- and
//! answers overlap and window queries over the union. All intervals use
//! half-open checkout semantics: `end` is the checkout date, so a checkout
//! on another stay's check-in day is not a conflict.

use chrono::{DateTime, NaiveDate, Utc};
use ical_core::IcalEvent;
use serde::{Deserialize, Serialize};

/// Where a blocking event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSource {
    Direct,
    Channel,
}

/// A normalized blocking event. Never mutated in place: direct events are
/// appended by the booking path, channel events are replaced wholesale on
/// each resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub created: DateTime<Utc>,
    pub start: NaiveDate,
    /// Checkout date, exclusive.
    pub end: NaiveDate,
    pub summary: String,
    pub description: String,
    pub source: BlockSource,
}

impl CalendarEvent {
    /// Normalize an imported feed event into a channel block. Feeds rarely
    /// carry a DTSTAMP; the fetch time stands in when they do not.
    pub fn from_import(event: IcalEvent, fetched_at: DateTime<Utc>) -> Self {
        Self {
            uid: event.uid,
            created: event.created.unwrap_or(fetched_at),
            start: event.start,
            end: event.end,
            summary: event.summary,
            description: event.description,
            source: BlockSource::Channel,
        }
    }
}

/// A blocked date range as exposed to calendar UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source: BlockSource,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarStore {
    direct: Vec<CalendarEvent>,
    channel: Vec<CalendarEvent>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a direct reservation. The caller gates on availability first.
    pub fn insert_direct(&mut self, event: CalendarEvent) {
        self.direct.push(event);
    }

    /// Replace the entire imported set with the latest resync result
    /// (last-write-wins, never merged incrementally). Degenerate intervals
    /// are dropped here so `start < end` holds for everything stored.
    pub fn replace_channel(&mut self, mut events: Vec<CalendarEvent>) {
        events.retain(|e| e.start < e.end);
        self.channel = events;
    }

    /// Whether `[arrival, departure)` is free of every known interval.
    ///
    /// Fails closed: an inverted or empty range is never available. Two
    /// intervals conflict iff `arrival < end && departure > start`, which
    /// deliberately excludes the abutting case -- same-day
    /// checkout/check-in transitions are allowed.
    pub fn is_range_available(&self, arrival: NaiveDate, departure: NaiveDate) -> bool {
        if arrival >= departure {
            return false;
        }
        !self
            .events()
            .any(|e| arrival < e.end && departure > e.start)
    }

    /// All known intervals, direct reservations first, unfiltered.
    pub fn blocked_ranges(&self) -> Vec<BlockedInterval> {
        self.events().map(interval).collect()
    }

    /// Intervals touching `[from, to]`. An interval entirely outside the
    /// window is dropped; a partial overlap is returned in full, not
    /// clipped.
    pub fn availability_window(&self, from: NaiveDate, to: NaiveDate) -> Vec<BlockedInterval> {
        self.events()
            .filter(|e| !(e.end < from || e.start > to))
            .map(interval)
            .collect()
    }

    /// Export every known event as calendar text for channel consumption.
    pub fn export_ical(&self) -> String {
        let events: Vec<IcalEvent> = self
            .events()
            .map(|e| IcalEvent {
                uid: e.uid.clone(),
                created: Some(e.created),
                start: e.start,
                end: e.end,
                summary: e.summary.clone(),
                description: e.description.clone(),
            })
            .collect();
        ical_core::encode(&events)
    }

    fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.direct.iter().chain(self.channel.iter())
    }
}

fn interval(event: &CalendarEvent) -> BlockedInterval {
    BlockedInterval {
        start: event.start,
        end: event.end,
        source: event.source,
    }
}
