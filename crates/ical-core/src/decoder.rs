//! Feed decoder: calendar text → list of events.
//!
//! Parsing is tolerant and best-effort, matching what channel feeds emit
//! in practice:
//!
//! - Folded lines (continuations starting with a space or tab) are joined
//!   before any property is read.
//! - Property parameters (`DTSTART;VALUE=DATE:20260301`) are stripped; only
//!   the property name before the first `;` matters.
//! - Unknown property names are ignored.
//! - Events missing a parseable DTSTART or DTEND are dropped, never
//!   surfaced as errors: one broken event must not poison the feed.
//! - Both all-day (`20260301`) and timed (`20260301T140000Z`) stamps are
//!   accepted; timed stamps normalize to their calendar date.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::{IcalError, Result};
use crate::types::IcalEvent;

/// Parse feed text into events.
///
/// Never fails: a feed with no usable VEVENT blocks simply decodes to an
/// empty list.
pub fn decode(text: &str) -> Vec<IcalEvent> {
    let mut events = Vec::new();
    let mut props: Option<BTreeMap<String, String>> = None;

    for line in unfold(text) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            props = Some(BTreeMap::new());
            continue;
        }

        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(collected) = props.take() {
                if let Some(event) = build_event(collected) {
                    events.push(event);
                }
            }
            continue;
        }

        if let Some(collected) = props.as_mut() {
            if let Some((key, value)) = line.split_once(':') {
                // Strip parameters: DTSTART;VALUE=DATE -> DTSTART.
                let name = key
                    .split(';')
                    .next()
                    .unwrap_or(key)
                    .trim()
                    .to_ascii_uppercase();
                collected.insert(name, value.trim().to_string());
            }
        }
    }

    events
}

/// Parse a calendar date value.
///
/// Accepts compact (`20260301`), compact timed (`20260301T140000Z`, the
/// time portion is discarded) and ISO (`2026-03-01`) forms.
///
/// # Errors
/// Returns `IcalError::InvalidDate` when no form matches.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() >= 8 {
        if let Ok(date) = NaiveDate::parse_from_str(&digits[..8], "%Y%m%d") {
            return Ok(date);
        }
    }

    Err(IcalError::InvalidDate(value.to_string()))
}

/// Parse a timestamp value (DTSTAMP and friends).
///
/// Accepts `20260301T140000Z`, the same without the trailing `Z`, ISO
/// datetimes, and bare dates (which resolve to midnight UTC).
///
/// # Errors
/// Returns `IcalError::InvalidStamp` when no form matches.
pub fn parse_stamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim().trim_end_matches('Z');

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y%m%dT%H%M%S") {
        return Ok(dt.and_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.and_utc());
    }

    if let Ok(date) = parse_date(trimmed) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(IcalError::InvalidStamp(value.to_string()))
}

/// Assemble an event from collected properties. Returns `None` when the
/// block is unusable (missing or unparseable DTSTART/DTEND).
fn build_event(props: BTreeMap<String, String>) -> Option<IcalEvent> {
    let start = parse_date(props.get("DTSTART")?).ok()?;
    let end = parse_date(props.get("DTEND")?).ok()?;
    let created = props.get("DTSTAMP").and_then(|v| parse_stamp(v).ok());

    let uid = match props.get("UID") {
        Some(uid) if !uid.is_empty() => uid.clone(),
        _ => derived_uid(&props),
    };

    Some(IcalEvent {
        uid,
        created,
        start,
        end,
        summary: unescape_text(props.get("SUMMARY").map_or("", String::as_str)),
        description: unescape_text(props.get("DESCRIPTION").map_or("", String::as_str)),
    })
}

/// Derive a stable identifier for an event that carries no UID.
///
/// Hashes the serialized property map, so re-importing the same feed yields
/// the same identifier for the same event.
fn derived_uid(props: &BTreeMap<String, String>) -> String {
    let serialized = serde_json::to_string(props).unwrap_or_default();
    let mut digest = hex::encode(Sha256::digest(serialized.as_bytes()));
    digest.truncate(32);
    digest
}

/// Join folded continuation lines (leading space or tab) onto their parent.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        if raw.starts_with(' ') || raw.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&raw[1..]);
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

/// Undo TEXT escaping: `\\`, `\;`, `\,` and `\n`/`\N`.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}
