//! Feed encoder: list of events → calendar text.
//!
//! Produces the strict form of the format the decoder accepts: a single
//! VCALENDAR wrapper, one VEVENT block per event, CRLF line endings, and
//! date-valued DTSTART/DTEND. TEXT values (SUMMARY, DESCRIPTION) have
//! markup tags stripped and backslash, semicolon and comma escaped per the
//! format's rules.

use crate::types::IcalEvent;

const PRODID: &str = "-//Stay Core//Availability//EN";

/// Render events as a calendar document.
pub fn encode(events: &[IcalEvent]) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
    ];

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", event.uid));
        if let Some(created) = event.created {
            lines.push(format!("DTSTAMP:{}", created.format("%Y%m%dT%H%M%SZ")));
        }
        lines.push(format!(
            "DTSTART;VALUE=DATE:{}",
            event.start.format("%Y%m%d")
        ));
        lines.push(format!("DTEND;VALUE=DATE:{}", event.end.format("%Y%m%d")));
        lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

/// Escape a TEXT value: strip markup tags, then escape backslash,
/// semicolon and comma. Literal newlines become `\n`.
fn escape_text(value: &str) -> String {
    let stripped = strip_tags(value);
    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Drop `<...>` markup spans from free text. Unbalanced `<` swallows the
/// rest of the string, which is the safe direction for exported feeds.
fn strip_tags(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_tag = false;
    for c in value.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
