// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod alerts;
mod dates;
mod deadline;
mod error;
mod summary;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use alerts::{AlertKind, DeadlineAlert, DeadlineAlerts, build_alerts};
pub use dates::{format_date, format_timestamp, is_strict_iso_date, parse_calendar_date, today_utc};
pub use deadline::{
    days_pending, days_until_due, display_status, effective_due_date, is_overdue,
    statutory_timeline_days,
};
pub use summary::{
    CategoryCount, DashboardSummary, Overview, PortalCount, StatusCount, WeeklyCount, summarize,
};

// Re-export public types
pub use error::DomainError;
pub use types::{
    AttachmentRef, Category, Complaint, ComplaintDraft, ComplaintPatch, ComplaintStatus,
    DisplayStatus, NaturalKey, SectionDetails, SyncRun,
};
pub use validation::{validate_complaint, validate_complaint_fields};
