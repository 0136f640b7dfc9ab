// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are generic over the store's collaborators and take the current
//! instant as an argument, so they never read the clock themselves.

use rti_tracker::{
    AttachmentStore, ComplaintCache, ComplaintRemote, ComplaintStore, FeedProfile,
    FeedSyncSummary, Moment, StoredAttachment, UpsertSummary,
};
use rti_tracker_domain::{
    AttachmentRef, Category, Complaint, ComplaintDraft, ComplaintPatch, ComplaintStatus,
    DeadlineAlerts, SyncRun, build_alerts, days_pending, days_until_due, display_status,
    effective_due_date, format_date, summarize, validate_complaint,
};
use rti_tracker_persistence::Persistence;
use time::Date;
use tracing::{info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AlertsResponse, AttachDocumentResponse, BulkUpsertRequest, BulkUpsertResponse,
    ComplaintResponse, CreateComplaintRequest, DashboardResponse, FeedSyncRequest,
    FeedSyncResponse, HealthResponse, ImportDocument, ImportResponse, ListSyncRunsResponse,
    UpdateComplaintRequest, UpsertComplaintRequest,
};

/// Alerts shown on the dashboard, per list.
pub const DASHBOARD_ALERT_LIMIT: usize = 5;

/// Alerts returned by the alerts endpoint when no limit is requested.
pub const DEFAULT_ALERT_LIMIT: usize = 6;

/// Portal recorded for imported records that do not name one.
pub const UNKNOWN_PORTAL: &str = "Unknown";

/// Builds the read view of a complaint.
#[must_use]
pub fn to_response(complaint: &Complaint, today: Date) -> ComplaintResponse {
    ComplaintResponse {
        due_date: effective_due_date(complaint).map(format_date),
        days_until_due: days_until_due(complaint, today),
        display_status: display_status(complaint, today),
        days_pending: days_pending(complaint, today),
        complaint: complaint.clone(),
    }
}

fn parse_status(value: Option<&str>) -> Result<Option<ComplaintStatus>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label
            .parse::<ComplaintStatus>()
            .map(Some)
            .map_err(translate_domain_error),
    }
}

fn parse_category(value: Option<&str>) -> Option<Category> {
    value.map(Category::parse_lenient)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lists every complaint, most recently lodged first.
///
/// Ties on the lodged date are broken by the most recent update.
pub fn list_complaints<R, C, A>(
    store: &ComplaintStore<R, C, A>,
    today: Date,
) -> Vec<ComplaintResponse>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let mut complaints: Vec<&Complaint> = store.complaints().iter().collect();
    complaints.sort_by(|a, b| {
        b.date_lodged
            .cmp(&a.date_lodged)
            .then_with(|| b.last_updated.cmp(&a.last_updated))
    });

    complaints
        .into_iter()
        .map(|complaint| to_response(complaint, today))
        .collect()
}

/// Creates a complaint, or folds it into the one with the same natural key.
///
/// # Errors
///
/// Returns an error if:
/// - The status is not a known status
/// - A required field is blank or a date does not parse
pub fn create_complaint<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    request: CreateComplaintRequest,
    now: &Moment,
) -> Result<ComplaintResponse, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let status: ComplaintStatus = parse_status(request.status.as_deref())?.unwrap_or_default();
    let category: Category = parse_category(request.category.as_deref()).unwrap_or_default();

    let draft: ComplaintDraft = ComplaintDraft {
        id: non_blank(request.id),
        complaint_id: request.complaint_id,
        complaint_name: request.complaint_name,
        portal_name: request.portal_name,
        category,
        description: request.description,
        date_lodged: request.date_lodged,
        status,
        department: request.department,
        office_email: request.office_email,
        office_phone: request.office_phone,
        expected_response_date: request.expected_response_date,
        documents: request.documents,
        notes: request.notes,
        section_data: request.section_data,
        resolved_at: non_blank(request.resolved_at),
    };

    let saved: Complaint = store.create(draft, now).map_err(translate_core_error)?;
    info!(id = %saved.id, key = %saved.natural_key(), "Complaint saved");

    Ok(to_response(&saved, now.today()))
}

/// Changes some fields of a complaint.
///
/// # Errors
///
/// Returns an error if:
/// - The complaint does not exist
/// - The status is not a known status
/// - The change would duplicate another complaint's natural key
pub fn update_complaint<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    id: &str,
    request: UpdateComplaintRequest,
    now: &Moment,
) -> Result<ComplaintResponse, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let patch: ComplaintPatch = ComplaintPatch {
        complaint_id: request.complaint_id,
        complaint_name: request.complaint_name,
        portal_name: request.portal_name,
        category: parse_category(request.category.as_deref()),
        description: request.description,
        date_lodged: request.date_lodged,
        status: parse_status(request.status.as_deref())?,
        department: request.department,
        office_email: request.office_email,
        office_phone: request.office_phone,
        expected_response_date: request.expected_response_date,
        documents: request.documents,
        notes: request.notes,
        section_data: request.section_data,
        resolved_at: non_blank(request.resolved_at),
    };

    let saved: Complaint = store
        .update(id, patch, now)
        .map_err(translate_core_error)?;

    Ok(to_response(&saved, now.today()))
}

/// Deletes a complaint and its attachments.
///
/// # Errors
///
/// Returns an error if the complaint does not exist.
pub fn delete_complaint<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    id: &str,
    now: &Moment,
) -> Result<(), ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    store.delete(id, now).map_err(translate_core_error)?;
    info!(id, "Complaint deleted");
    Ok(())
}

/// Fills in an upserted record the way the importer does.
///
/// # Errors
///
/// Returns an error naming `complaints[index].<field>` if the record has no
/// complaint id, an unknown status, or an unparsable date.
pub fn complaint_from_upsert(
    record: UpsertComplaintRequest,
    index: usize,
    now: &Moment,
) -> Result<Complaint, ApiError> {
    let at = |err: ApiError| -> ApiError {
        match err {
            ApiError::InvalidInput { field, message } => ApiError::InvalidInput {
                field: format!("complaints[{index}].{field}"),
                message,
            },
            other => other,
        }
    };

    let complaint_id: String = record
        .complaint_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let portal_name: String = non_blank(record.portal_name)
        .map_or_else(|| UNKNOWN_PORTAL.to_string(), |p| p.trim().to_string());
    let status: ComplaintStatus = parse_status(record.status.as_deref())
        .map_err(at)?
        .unwrap_or_default();

    let complaint: Complaint = Complaint {
        id: record.id.unwrap_or_default(),
        complaint_id,
        complaint_name: record.complaint_name.unwrap_or_default(),
        portal_name,
        category: parse_category(record.category.as_deref()).unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        date_lodged: non_blank(record.date_lodged).unwrap_or_else(|| now.date_string()),
        status,
        department: record.department.unwrap_or_default(),
        office_email: record.office_email.unwrap_or_default(),
        office_phone: record.office_phone.unwrap_or_default(),
        expected_response_date: non_blank(record.expected_response_date),
        documents: record.documents.unwrap_or_default(),
        notes: record.notes.unwrap_or_default(),
        section_data: record.section_data,
        last_updated: non_blank(record.last_updated)
            .unwrap_or_else(|| now.timestamp().to_string()),
        resolved_at: non_blank(record.resolved_at),
    };

    validate_complaint(&complaint)
        .map_err(translate_domain_error)
        .map_err(at)?;

    Ok(complaint)
}

fn complaints_from_upserts(
    records: Vec<UpsertComplaintRequest>,
    now: &Moment,
) -> Result<Vec<Complaint>, ApiError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| complaint_from_upsert(record, index, now))
        .collect()
}

const fn to_bulk_response(summary: UpsertSummary) -> BulkUpsertResponse {
    BulkUpsertResponse {
        upserted: summary.upserted,
        inserted: summary.inserted,
        updated: summary.updated,
    }
}

/// Reconciles many complaints into the store by natural key.
///
/// Nothing is written unless every record is valid.
///
/// # Errors
///
/// Returns an error if any record is invalid or the remote refuses them.
pub fn bulk_upsert<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    request: BulkUpsertRequest,
    now: &Moment,
) -> Result<BulkUpsertResponse, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let complaints: Vec<Complaint> = complaints_from_upserts(request.complaints, now)?;
    let summary: UpsertSummary = store
        .bulk_upsert(complaints)
        .map_err(translate_core_error)?;

    info!(
        upserted = summary.upserted,
        inserted = summary.inserted,
        updated = summary.updated,
        "Bulk upsert complete"
    );
    Ok(to_bulk_response(summary))
}

/// Parses an import file.
///
/// # Errors
///
/// Returns an error if the text is neither an array of records nor an
/// object with a `complaints` array.
pub fn parse_import_document(text: &str) -> Result<ImportDocument, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::InvalidInput {
        field: String::from("file"),
        message: format!(
            "Input must be an array or an object with a \"complaints\" array: {e}"
        ),
    })
}

/// Imports a file of complaints and records the run.
///
/// Recording the run is best-effort; a failure is logged.
///
/// # Errors
///
/// Returns an error if any record is invalid or the remote refuses them.
pub fn import_complaints<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    document: ImportDocument,
    source: &str,
    now: &Moment,
) -> Result<ImportResponse, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let request: BulkUpsertRequest = BulkUpsertRequest {
        complaints: document.into_records(),
    };
    let summary: BulkUpsertResponse = bulk_upsert(store, request, now)?;

    let run: SyncRun = SyncRun {
        id: None,
        source: source.to_string(),
        status: String::from("ok"),
        count_imported: u32::try_from(summary.inserted).unwrap_or(u32::MAX),
        message: Some(format!(
            "{} records, {} new, {} updated",
            summary.upserted, summary.inserted, summary.updated
        )),
        created_at: now.timestamp().to_string(),
    };
    if let Err(e) = store.remote_mut().record_sync_run(&run) {
        warn!(error = %e, source, "Failed to record import run");
    }

    Ok(ImportResponse {
        source: source.to_string(),
        summary,
    })
}

/// Imports a Smart UMC grievance feed.
///
/// # Errors
///
/// Returns an error if the remote refuses the imported records.
pub fn sync_feed<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    request: FeedSyncRequest,
    now: &Moment,
) -> Result<FeedSyncResponse, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let profile: FeedProfile = FeedProfile::smart_umc();
    let summary: FeedSyncSummary = store
        .sync_feed(request.feed, &profile, request.force, now)
        .map_err(translate_core_error)?;

    Ok(FeedSyncResponse {
        imported: summary.imported,
        skipped: summary.skipped,
        synced_at: summary.synced_at,
    })
}

/// Builds the dashboard counts and its short alert lists.
pub fn dashboard<R, C, A>(store: &ComplaintStore<R, C, A>, today: Date) -> DashboardResponse
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    DashboardResponse {
        summary: summarize(store.complaints(), today),
        alerts: build_alerts(store.complaints(), today, DASHBOARD_ALERT_LIMIT),
    }
}

/// Lists overdue and upcoming deadlines.
pub fn alerts<R, C, A>(
    store: &ComplaintStore<R, C, A>,
    today: Date,
    limit: Option<usize>,
) -> AlertsResponse
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    let alerts: DeadlineAlerts = build_alerts(
        store.complaints(),
        today,
        limit.unwrap_or(DEFAULT_ALERT_LIMIT),
    );
    AlertsResponse { alerts }
}

/// Stores a document and attaches it to a complaint.
///
/// # Errors
///
/// Returns an error if the complaint does not exist or the blob cannot be
/// stored.
pub fn attach_document<R, C, A>(
    store: &mut ComplaintStore<R, C, A>,
    complaint_id: &str,
    name: &str,
    mime_type: &str,
    bytes: &[u8],
    now: &Moment,
) -> Result<AttachDocumentResponse, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    if name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Document name must not be empty"),
        });
    }

    let document: AttachmentRef = store
        .attach_document(complaint_id, name.trim(), mime_type, bytes, now)
        .map_err(translate_core_error)?;

    Ok(AttachDocumentResponse { document })
}

/// Reads a stored document.
///
/// # Errors
///
/// Returns an error if no document has this id.
pub fn read_document<R, C, A>(
    store: &ComplaintStore<R, C, A>,
    id: &str,
) -> Result<StoredAttachment, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    store.read_document(id).map_err(translate_core_error)
}

/// Lists past imports and feed synchronizations.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sync_runs(
    persistence: &mut Persistence,
    limit: i64,
) -> Result<ListSyncRunsResponse, ApiError> {
    let sync_runs: Vec<SyncRun> = persistence
        .list_sync_runs(limit)
        .map_err(translate_persistence_error)?;
    Ok(ListSyncRunsResponse { sync_runs })
}

/// Probes the database.
#[must_use]
pub fn health(persistence: &mut Persistence) -> HealthResponse {
    match persistence.health_check() {
        Ok(()) => HealthResponse {
            ok: true,
            error: None,
        },
        Err(e) => {
            warn!(error = %e, "Health check failed");
            HealthResponse {
                ok: false,
                error: Some(e.to_string()),
            }
        }
    }
}
