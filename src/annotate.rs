//! Due-date annotation parsing.
//!
//! Raw todo input may carry a trailing `@`-prefixed due-date annotation, e.g.
//! `"Pay rent @6 September 2024"`. This module extracts the annotation and
//! resolves it into an absolute UTC instant.
//!
//! Parsing is silent-degrade: an unparseable annotation never blocks todo
//! creation. The marker and its payload simply stay part of the title and no
//! due date is attached.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use nudge::annotate::parse;
//!
//! let parsed = parse("Pay rent @2024-09-06", Utc::now());
//! assert_eq!(parsed.title, "Pay rent");
//! assert!(parsed.due_date.is_some());
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Marker introducing a due-date annotation. Only the first occurrence is
/// treated as the marker; everything after it is the date payload.
pub const ANNOTATION_MARKER: char = '@';

/// Date-only payload formats, resolved to midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%B %d %Y", "%d/%m/%Y"];

/// Date-and-time payload formats.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Result of annotation parsing: the stored title and an optional due instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    /// Title with the marker and payload stripped on a successful parse,
    /// otherwise the trimmed raw input.
    pub title: String,

    /// Due instant resolved from the annotation payload, if any.
    pub due_date: Option<DateTime<Utc>>,
}

/// Extracts an optional due date from raw todo input.
///
/// `now` anchors the relative keywords `today` and `tomorrow`; passing it
/// explicitly keeps the parser pure and testable.
///
/// # Arguments
///
/// * `raw` - Raw user input, possibly carrying an `@` annotation
/// * `now` - Current instant used to resolve relative keywords
#[must_use]
pub fn parse(raw: &str, now: DateTime<Utc>) -> Annotated {
    let Some(marker_idx) = raw.find(ANNOTATION_MARKER) else {
        return Annotated {
            title: raw.trim().to_string(),
            due_date: None,
        };
    };

    let payload = &raw[marker_idx + ANNOTATION_MARKER.len_utf8()..];
    match parse_payload(payload.trim(), now) {
        Some(due_date) => Annotated {
            title: raw[..marker_idx].trim().to_string(),
            due_date: Some(due_date),
        },
        // Unparseable payload: leave the annotation in the title untouched.
        None => Annotated {
            title: raw.trim().to_string(),
            due_date: None,
        },
    }
}

/// Interprets an annotation payload as a calendar date/time expression.
fn parse_payload(payload: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if payload.is_empty() {
        return None;
    }

    if payload.eq_ignore_ascii_case("today") {
        return Some(now);
    }
    if payload.eq_ignore_ascii_case("tomorrow") {
        return Some(now + Duration::hours(24));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(payload) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(payload, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(payload, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
