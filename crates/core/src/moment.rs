// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rti_tracker_domain::{DomainError, format_date, format_timestamp};
use time::{Date, OffsetDateTime, UtcOffset};

/// The instant a mutation happens, in the two shapes records store it.
///
/// Passed explicitly into every transition so results are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
    today: Date,
    timestamp: String,
}

impl Moment {
    /// Creates a moment from an instant, normalized to UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be written as RFC 3339.
    pub fn from_datetime(instant: OffsetDateTime) -> Result<Self, DomainError> {
        let utc: OffsetDateTime = instant.to_offset(UtcOffset::UTC);
        Ok(Self {
            today: utc.date(),
            timestamp: format_timestamp(utc)?,
        })
    }

    /// Returns the current moment.
    ///
    /// # Errors
    ///
    /// Returns an error if the system clock is outside the RFC 3339 range.
    pub fn now() -> Result<Self, DomainError> {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// Returns the calendar date of this moment.
    #[must_use]
    pub const fn today(&self) -> Date {
        self.today
    }

    /// Returns the calendar date as `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        format_date(self.today)
    }

    /// Returns the RFC 3339 timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Generates a fresh opaque identifier with the given prefix.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{:016x}", rand::random::<u64>())
}
