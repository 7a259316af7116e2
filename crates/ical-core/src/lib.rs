//! # ical-core
//!
//! Tolerant parser and escaping writer for the plain-text calendar feed
//! format used by vacation-rental channels (VCALENDAR/VEVENT blocks with
//! one `KEY:value` line per property).
//!
//! The decoder is best-effort by design: channel managers emit wildly
//! inconsistent feeds, so unknown keys are ignored, malformed events are
//! dropped rather than failing the whole feed, and both all-day and timed
//! date stamps are accepted. The encoder produces the strict form of the
//! same format with TEXT values escaped per the format's rules.
//!
//! ## Modules
//!
//! - [`decoder`] — feed text → list of [`IcalEvent`]s
//! - [`encoder`] — list of [`IcalEvent`]s → feed text
//! - [`types`] — the `IcalEvent` value type
//! - [`error`] — error types for date parsing

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod types;

pub use decoder::{decode, parse_date, parse_stamp};
pub use encoder::encode;
pub use error::IcalError;
pub use types::IcalEvent;
