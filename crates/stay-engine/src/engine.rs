//! The engine facade: the narrow contract the plugin's outer layers (HTTP
//! routes, admin screens, the resync scheduler, the booking-confirmation
//! webhook) consume.
//!
//! The facade owns the two pieces of shared state the spec allows -- the
//! calendar's cached imported set and the coupon redemption ledger --
//! behind read/write locks, so resync and quoting can run from different
//! tasks. Per-visitor pressure state stays caller-owned and is threaded
//! through explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

use crate::calendar::{BlockSource, BlockedInterval, CalendarEvent, CalendarStore};
use crate::config::PropertyConfig;
use crate::error::{EngineError, Result};
use crate::pressure::{self, ViewPressureState};
use crate::quote::{self, NightlyRate, Quote};
use crate::redemption::RedemptionLedger;

pub struct BookingEngine {
    config: PropertyConfig,
    calendar: RwLock<CalendarStore>,
    redemptions: RwLock<RedemptionLedger>,
}

impl BookingEngine {
    pub fn new(config: PropertyConfig) -> Self {
        Self {
            config,
            calendar: RwLock::new(CalendarStore::new()),
            redemptions: RwLock::new(RedemptionLedger::new()),
        }
    }

    pub fn config(&self) -> &PropertyConfig {
        &self.config
    }

    /// Quote a stay.
    ///
    /// Dates arrive as ISO strings from the outer layer; parse failures
    /// and inverted ranges are rejected synchronously, and a range that
    /// conflicts with a known interval is surfaced distinctly so the
    /// caller can prompt for new dates. A valid request records a page
    /// view (honoring do-not-track) before pricing, then computes the
    /// quote. An invalid coupon never fails the quote; it rides along as
    /// `coupon_error`.
    ///
    /// # Errors
    /// `InvalidDate`, `InvalidRange`, or `Unavailable`.
    #[allow(clippy::too_many_arguments)]
    pub fn quote(
        &self,
        arrival: &str,
        departure: &str,
        guests: u32,
        coupon_code: Option<&str>,
        visitor: &mut ViewPressureState,
        do_not_track: bool,
        now: DateTime<Utc>,
    ) -> Result<Quote> {
        let (arrival, departure) = parse_range(arrival, departure)?;

        if !self.is_available(arrival, departure) {
            return Err(EngineError::Unavailable { arrival, departure });
        }

        pressure::track_view(visitor, do_not_track, now);

        let ledger = self.redemptions.read();
        Ok(quote::calculate_quote(
            &self.config,
            arrival,
            departure,
            guests,
            coupon_code,
            visitor,
            &ledger,
            now,
        ))
    }

    /// Whether `[arrival, departure)` is free across every source.
    pub fn is_available(&self, arrival: NaiveDate, departure: NaiveDate) -> bool {
        self.calendar.read().is_range_available(arrival, departure)
    }

    /// All known blocked intervals, for rendering.
    pub fn blocked_ranges(&self) -> Vec<BlockedInterval> {
        self.calendar.read().blocked_ranges()
    }

    /// Blocked intervals touching `[from, to]`.
    pub fn availability_window(&self, from: NaiveDate, to: NaiveDate) -> Vec<BlockedInterval> {
        self.calendar.read().availability_window(from, to)
    }

    /// Record a confirmed direct reservation, gated on availability under
    /// the calendar write lock so two racing bookings cannot both land.
    ///
    /// # Errors
    /// `InvalidRange` or `Unavailable`.
    pub fn block_direct(
        &self,
        booking_ref: &str,
        arrival: NaiveDate,
        departure: NaiveDate,
        guests: u32,
        summary: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if arrival >= departure {
            return Err(EngineError::InvalidRange { arrival, departure });
        }

        let mut calendar = self.calendar.write();
        if !calendar.is_range_available(arrival, departure) {
            return Err(EngineError::Unavailable { arrival, departure });
        }

        calendar.insert_direct(CalendarEvent {
            uid: format!("{booking_ref}@stay-core"),
            created: now,
            start: arrival,
            end: departure,
            summary: summary.to_string(),
            description: format!("Guests: {guests}"),
            source: BlockSource::Direct,
        });
        Ok(())
    }

    /// Replace the imported channel set with the latest resync result.
    pub fn replace_channel_events(&self, events: Vec<CalendarEvent>) {
        self.calendar.write().replace_channel(events);
    }

    /// Export every known interval as calendar text.
    pub fn export_calendar(&self) -> String {
        self.calendar.read().export_ical()
    }

    /// Record a coupon redemption for a completed booking. At-most-once
    /// per booking reference; returns whether the counter moved.
    pub fn record_redemption(&self, code: &str, booking_ref: &str) -> bool {
        self.redemptions.write().record(code, booking_ref)
    }

    pub fn redemption_count(&self, code: &str) -> u32 {
        self.redemptions.read().count(code)
    }

    /// Freeze the visitor's uplift: called once when a quote becomes a
    /// confirmed booking.
    pub fn mark_uplift_applied(
        &self,
        visitor: &mut ViewPressureState,
        do_not_track: bool,
        now: DateTime<Utc>,
    ) {
        pressure::mark_uplift_applied(visitor, do_not_track, now);
    }

    /// Per-day advertised rates for a calendar view.
    pub fn nightly_rates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        visitor: &mut ViewPressureState,
        now: DateTime<Utc>,
    ) -> Vec<NightlyRate> {
        quote::nightly_rates(&self.config, from, to, visitor, now)
    }
}

fn parse_range(arrival: &str, departure: &str) -> Result<(NaiveDate, NaiveDate)> {
    let arrival = parse_date(arrival)?;
    let departure = parse_date(departure)?;
    if arrival >= departure {
        return Err(EngineError::InvalidRange { arrival, departure });
    }
    Ok((arrival, departure))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    value
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidDate(value.to_string()))
}
