// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Wire names are camelCase. Request fields that name an enumeration are
//! plain strings and are parsed by the handlers, so a bad value is reported
//! against the field that carried it.

use rti_tracker::Feed;
use rti_tracker_domain::{
    AttachmentRef, Complaint, DashboardSummary, DeadlineAlerts, DisplayStatus, SectionDetails,
    SyncRun,
};
use serde::{Deserialize, Serialize};

/// A complaint together with the values derived from it on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    /// The stored record.
    #[serde(flatten)]
    pub complaint: Complaint,
    /// Effective due date, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Signed whole days from today to the due date.
    pub days_until_due: Option<i64>,
    /// Stored status, or `Overdue`.
    pub display_status: DisplayStatus,
    /// Days since lodging, if the lodged date parses.
    pub days_pending: Option<u32>,
}

/// API request to create a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub id: Option<String>,
    pub complaint_id: String,
    pub complaint_name: String,
    pub portal_name: String,
    /// Unknown categories are stored as `Other`.
    pub category: Option<String>,
    pub description: String,
    /// Defaults to today.
    pub date_lodged: String,
    /// Defaults to `Submitted`.
    pub status: Option<String>,
    pub department: String,
    pub office_email: String,
    pub office_phone: String,
    pub expected_response_date: Option<String>,
    pub documents: Vec<AttachmentRef>,
    pub notes: String,
    pub section_data: Option<SectionDetails>,
    pub resolved_at: Option<String>,
}

/// API request to change some fields of a complaint.
///
/// Absent fields are left unchanged. An empty `expectedResponseDate`
/// removes the explicit due date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub complaint_id: Option<String>,
    pub complaint_name: Option<String>,
    pub portal_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date_lodged: Option<String>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub office_email: Option<String>,
    pub office_phone: Option<String>,
    pub expected_response_date: Option<String>,
    pub documents: Option<Vec<AttachmentRef>>,
    pub notes: Option<String>,
    pub section_data: Option<SectionDetails>,
    pub resolved_at: Option<String>,
}

/// One record in a bulk upsert or an import file.
///
/// Every field is optional; missing values are filled in the way the
/// importer always has.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpsertComplaintRequest {
    pub id: Option<String>,
    pub complaint_id: Option<String>,
    pub complaint_name: Option<String>,
    pub portal_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date_lodged: Option<String>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub office_email: Option<String>,
    pub office_phone: Option<String>,
    pub expected_response_date: Option<String>,
    pub documents: Option<Vec<AttachmentRef>>,
    pub notes: Option<String>,
    pub section_data: Option<SectionDetails>,
    pub last_updated: Option<String>,
    pub resolved_at: Option<String>,
}

/// API request to reconcile many complaints by natural key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkUpsertRequest {
    pub complaints: Vec<UpsertComplaintRequest>,
}

/// API response for a bulk upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpsertResponse {
    /// Records received.
    pub upserted: usize,
    /// Records that did not exist before.
    pub inserted: usize,
    /// Records folded into an existing complaint.
    pub updated: usize,
}

/// An import file: a bare array of records, or an object wrapping one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ImportDocument {
    /// `[ {...}, ... ]`
    List(Vec<UpsertComplaintRequest>),
    /// `{ "complaints": [ {...}, ... ] }`
    Wrapped {
        /// The wrapped records.
        complaints: Vec<UpsertComplaintRequest>,
    },
}

impl ImportDocument {
    /// Returns the records in file order.
    #[must_use]
    pub fn into_records(self) -> Vec<UpsertComplaintRequest> {
        match self {
            Self::List(records) | Self::Wrapped { complaints: records } => records,
        }
    }
}

/// API response for a file import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Where the records came from.
    pub source: String,
    /// Counts from the underlying bulk upsert.
    #[serde(flatten)]
    pub summary: BulkUpsertResponse,
}

/// API request to import a portal feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedSyncRequest {
    /// The feed document.
    #[serde(flatten)]
    pub feed: Feed,
    /// Import even if this feed was imported before.
    pub force: bool,
}

/// API response for a feed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSyncResponse {
    /// Complaints that did not exist before.
    pub imported: usize,
    /// True if the feed had already been imported.
    pub skipped: bool,
    /// The feed's `syncedAt`, if any.
    pub synced_at: Option<String>,
}

/// API response for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Counts by status, category, portal and week.
    #[serde(flatten)]
    pub summary: DashboardSummary,
    /// The most urgent deadlines.
    pub alerts: DeadlineAlerts,
}

/// API response for deadline alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsResponse {
    /// Overdue and upcoming deadlines.
    #[serde(flatten)]
    pub alerts: DeadlineAlerts,
}

/// API response for an attached document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachDocumentResponse {
    /// Metadata of the stored document.
    pub document: AttachmentRef,
}

/// API response listing past imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSyncRunsResponse {
    /// Most recent first.
    pub sync_runs: Vec<SyncRun>,
}

/// API response for the health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// True if the database answered.
    pub ok: bool,
    /// Why the probe failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
