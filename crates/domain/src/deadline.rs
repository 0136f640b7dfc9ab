// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deadline computation for complaints.
//!
//! Every function here is a pure function of the complaint and the supplied
//! `today`. Any date that fails to parse makes the dependent result `None`
//! so that sorting and alerting can filter it out.
//!
//! ## Statutory timelines
//!
//! | Category  | Status        | Days |
//! |-----------|---------------|------|
//! | any       | terminal      | none |
//! | RTI       | Second Appeal | 90   |
//! | RTI       | other         | 30   |
//! | Grievance | any           | 30   |
//! | Other     | any           | 15   |

use crate::dates::parse_calendar_date;
use crate::types::{Category, Complaint, ComplaintStatus, DisplayStatus};
use time::{Date, Duration};

/// Returns the statutory response window in days, or `None` when the
/// status is terminal.
#[must_use]
pub const fn statutory_timeline_days(category: Category, status: ComplaintStatus) -> Option<u32> {
    if status.is_terminal() {
        return None;
    }

    match category {
        Category::Rti => match status {
            ComplaintStatus::SecondAppeal => Some(90),
            _ => Some(30),
        },
        Category::Grievance => Some(30),
        Category::Other => Some(15),
    }
}

/// Returns the date a response is due.
///
/// An explicit `expected_response_date` that parses always wins. Otherwise
/// the statutory window is added to `last_updated` for appeal stages (the
/// date the appeal was entered) and to `date_lodged` for everything else.
#[must_use]
pub fn effective_due_date(complaint: &Complaint) -> Option<Date> {
    if let Some(explicit) = complaint
        .expected_response_date
        .as_deref()
        .and_then(parse_calendar_date)
    {
        return Some(explicit);
    }

    let timeline: u32 = statutory_timeline_days(complaint.category, complaint.status)?;

    let base: Date = if complaint.status.is_appeal() {
        parse_calendar_date(&complaint.last_updated)?
    } else {
        parse_calendar_date(&complaint.date_lodged)?
    };

    base.checked_add(Duration::days(i64::from(timeline)))
}

/// Returns the signed number of calendar days from `today` until the due
/// date. Negative values mean the complaint is overdue.
#[must_use]
pub fn days_until_due(complaint: &Complaint, today: Date) -> Option<i64> {
    let due: Date = effective_due_date(complaint)?;
    Some((due - today).whole_days())
}

/// Returns true if a non-terminal complaint is past its due date.
#[must_use]
pub fn is_overdue(complaint: &Complaint, today: Date) -> bool {
    if complaint.is_terminal() {
        return false;
    }
    days_until_due(complaint, today).is_some_and(|days| days < 0)
}

/// Returns the status to show for a complaint.
#[must_use]
pub fn display_status(complaint: &Complaint, today: Date) -> DisplayStatus {
    if !complaint.is_terminal() && is_overdue(complaint, today) {
        return DisplayStatus::Overdue;
    }
    DisplayStatus::Stored(complaint.status)
}

/// Returns how many calendar days the complaint has been (or was) open.
///
/// Terminal complaints count up to `resolved_at` (or `last_updated` when
/// that is missing or unparsable); open complaints count up to `today`. The result is
/// never negative.
#[must_use]
pub fn days_pending(complaint: &Complaint, today: Date) -> Option<u32> {
    let start: Date = parse_calendar_date(&complaint.date_lodged)?;

    let end: Date = if complaint.is_terminal() {
        complaint
            .resolved_at
            .as_deref()
            .and_then(parse_calendar_date)
            .or_else(|| parse_calendar_date(&complaint.last_updated))?
    } else {
        today
    };

    let span: i64 = (end - start).whole_days().max(0);
    Some(u32::try_from(span).unwrap_or(u32::MAX))
}
