// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the complaint tracker.
//!
//! Handlers translate wire requests into store operations and store results
//! into wire responses. They know nothing about HTTP.

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
#![allow(clippy::multiple_crate_versions)]

mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
pub use export::{EXPORT_HEADERS, export_csv, render_csv};
pub use handlers::{
    DASHBOARD_ALERT_LIMIT, DEFAULT_ALERT_LIMIT, UNKNOWN_PORTAL, alerts, attach_document,
    bulk_upsert, complaint_from_upsert, create_complaint, dashboard, delete_complaint, health,
    import_complaints, list_complaints, list_sync_runs, parse_import_document, read_document,
    sync_feed, to_response, update_complaint,
};
pub use request_response::{
    AlertsResponse, AttachDocumentResponse, BulkUpsertRequest, BulkUpsertResponse,
    ComplaintResponse, CreateComplaintRequest, DashboardResponse, FeedSyncRequest,
    FeedSyncResponse, HealthResponse, ImportDocument, ImportResponse, ListSyncRunsResponse,
    UpdateComplaintRequest, UpsertComplaintRequest,
};
