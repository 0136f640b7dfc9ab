// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deadline alerts for open complaints.

use crate::dates::format_date;
use crate::deadline::effective_due_date;
use crate::types::Complaint;
use serde::{Deserialize, Serialize};
use time::Date;

/// Days ahead that count as "upcoming".
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Days ahead that count as "urgent".
pub const URGENT_WINDOW_DAYS: i64 = 2;

/// Which bucket an alert belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    Overdue,
    Upcoming,
}

/// A single complaint with an approaching or missed deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineAlert {
    pub id: String,
    pub complaint_id: String,
    pub complaint_name: String,
    pub portal_name: String,
    pub due_date: String,
    pub days_until_due: i64,
    pub kind: AlertKind,
}

/// Bucketed deadline alerts.
///
/// The lists are truncated to the requested limit; the counts are taken
/// over every qualifying complaint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineAlerts {
    pub overdue: Vec<DeadlineAlert>,
    pub upcoming: Vec<DeadlineAlert>,
    pub overdue_total: usize,
    #[serde(rename = "dueIn48h")]
    pub due_within_48h: usize,
    #[serde(rename = "dueIn7d")]
    pub due_within_7d: usize,
}

/// Builds the overdue and upcoming alert lists.
///
/// Only non-terminal complaints with a computable due date qualify. Each
/// list is ordered by days until due, most urgent first, keeping input
/// order among ties.
///
/// # Arguments
///
/// * `complaints` - The complaints to scan
/// * `today` - The reference date
/// * `limit` - Maximum number of entries kept in each list
#[must_use]
pub fn build_alerts(complaints: &[Complaint], today: Date, limit: usize) -> DeadlineAlerts {
    let mut alerts: DeadlineAlerts = DeadlineAlerts::default();

    for complaint in complaints.iter().filter(|c| !c.is_terminal()) {
        let Some(due) = effective_due_date(complaint) else {
            continue;
        };
        let days: i64 = (due - today).whole_days();

        let kind: AlertKind = if days < 0 {
            AlertKind::Overdue
        } else if days <= UPCOMING_WINDOW_DAYS {
            AlertKind::Upcoming
        } else {
            continue;
        };

        let alert: DeadlineAlert = DeadlineAlert {
            id: complaint.id.clone(),
            complaint_id: complaint.complaint_id.clone(),
            complaint_name: complaint.complaint_name.clone(),
            portal_name: complaint.portal_name.clone(),
            due_date: format_date(due),
            days_until_due: days,
            kind,
        };

        match kind {
            AlertKind::Overdue => alerts.overdue.push(alert),
            AlertKind::Upcoming => {
                if days <= URGENT_WINDOW_DAYS {
                    alerts.due_within_48h += 1;
                }
                alerts.due_within_7d += 1;
                alerts.upcoming.push(alert);
            }
        }
    }

    alerts.overdue_total = alerts.overdue.len();

    alerts.overdue.sort_by_key(|a| a.days_until_due);
    alerts.upcoming.sort_by_key(|a| a.days_until_due);
    alerts.overdue.truncate(limit);
    alerts.upcoming.truncate(limit);

    alerts
}
