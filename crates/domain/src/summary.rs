// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard aggregates over a set of complaints.

use crate::dates::{format_date, parse_calendar_date};
use crate::deadline::display_status;
use crate::types::{Category, Complaint, DisplayStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, Duration};

/// Number of portals listed individually before the rest are folded.
pub const TOP_PORTALS: usize = 6;

/// Number of weeks in the lodged timeline.
pub const TIMELINE_WEEKS: i64 = 12;

/// Label of the bucket holding the portals beyond the top ones.
pub const OTHER_PORTALS_LABEL: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total: usize,
    pub resolved: usize,
    pub overdue: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: DisplayStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalCount {
    pub portal_name: String,
    pub count: usize,
}

/// Complaints lodged in the week starting on `week_start` (a Monday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCount {
    pub week_start: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub overview: Overview,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryCount>,
    pub by_portal: Vec<PortalCount>,
    pub weekly_lodged: Vec<WeeklyCount>,
}

/// Computes the dashboard aggregates as of `today`.
///
/// Statuses are counted by display status, so overdue complaints appear
/// under `Overdue` rather than under their stored status.
#[must_use]
pub fn summarize(complaints: &[Complaint], today: Date) -> DashboardSummary {
    let mut overview: Overview = Overview {
        total: complaints.len(),
        ..Overview::default()
    };
    let mut statuses: BTreeMap<&'static str, (DisplayStatus, usize)> = BTreeMap::new();
    let mut portals: BTreeMap<&str, usize> = BTreeMap::new();

    for complaint in complaints {
        let shown: DisplayStatus = display_status(complaint, today);
        match shown {
            DisplayStatus::Overdue => overview.overdue += 1,
            s if s.is_terminal() => overview.resolved += 1,
            DisplayStatus::Stored(_) => overview.pending += 1,
        }
        statuses.entry(shown.as_str()).or_insert((shown, 0)).1 += 1;
        *portals.entry(complaint.portal_name.as_str()).or_insert(0) += 1;
    }

    let mut by_status: Vec<StatusCount> = statuses
        .into_values()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    // BTreeMap iteration already orders ties by label.
    by_status.sort_by(|a, b| b.count.cmp(&a.count));

    let by_category: Vec<CategoryCount> = Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: complaints.iter().filter(|c| c.category == category).count(),
        })
        .collect();

    DashboardSummary {
        overview,
        by_status,
        by_category,
        by_portal: fold_portals(portals),
        weekly_lodged: weekly_lodged(complaints, today),
    }
}

fn fold_portals(portals: BTreeMap<&str, usize>) -> Vec<PortalCount> {
    let mut ranked: Vec<(&str, usize)> = portals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let rest: usize = ranked.iter().skip(TOP_PORTALS).map(|(_, n)| n).sum();
    let mut folded: Vec<PortalCount> = ranked
        .into_iter()
        .take(TOP_PORTALS)
        .map(|(portal_name, count)| PortalCount {
            portal_name: portal_name.to_string(),
            count,
        })
        .collect();

    if rest > 0 {
        folded.push(PortalCount {
            portal_name: OTHER_PORTALS_LABEL.to_string(),
            count: rest,
        });
    }
    folded
}

fn weekly_lodged(complaints: &[Complaint], today: Date) -> Vec<WeeklyCount> {
    let this_monday: Date =
        today - Duration::days(i64::from(today.weekday().number_days_from_monday()));
    let first_monday: Date = this_monday - Duration::weeks(TIMELINE_WEEKS - 1);

    let lodged: Vec<Date> = complaints
        .iter()
        .filter_map(|c| parse_calendar_date(&c.date_lodged))
        .collect();

    (0..TIMELINE_WEEKS)
        .map(|week| {
            let start: Date = first_monday + Duration::weeks(week);
            let end: Date = start + Duration::weeks(1);
            WeeklyCount {
                week_start: format_date(start),
                count: lodged.iter().filter(|d| **d >= start && **d < end).count(),
            }
        })
        .collect()
}
