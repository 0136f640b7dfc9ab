// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar date parsing and formatting.
//!
//! Every date in the tracker is treated as a naive calendar date. A
//! timestamp contributes the calendar date written in it, without shifting
//! it into another offset, so `2026-03-01T23:30:00+05:30` is March 1st.

use crate::error::DomainError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parses a calendar date from a date or timestamp string.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and offset-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps. Anything else yields `None`.
#[must_use]
pub fn parse_calendar_date(value: &str) -> Option<Date> {
    let value: &str = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }

    if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(timestamp.date());
    }

    PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
    })
    .ok()
    .map(PrimitiveDateTime::date)
}

/// Returns true only for a valid calendar date written exactly as `YYYY-MM-DD`.
#[must_use]
pub fn is_strict_iso_date(value: &str) -> bool {
    let bytes: &[u8] = value.as_bytes();
    let shaped: bool = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });

    shaped && Date::parse(value, format_description!("[year]-[month]-[day]")).is_ok()
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats an instant as an RFC 3339 timestamp in UTC.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented in RFC 3339
/// (years outside `0000..=9999`).
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, DomainError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| DomainError::TimestampFormat {
            error: e.to_string(),
        })
}

/// Returns today's date in UTC.
#[must_use]
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}
