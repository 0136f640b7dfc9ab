// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of the complaint list.

use csv::Writer;
use rti_tracker::{AttachmentStore, ComplaintCache, ComplaintRemote, ComplaintStore};
use time::Date;

use crate::error::ApiError;
use crate::handlers::list_complaints;
use crate::request_response::ComplaintResponse;

/// Column headers of the export, in order.
pub const EXPORT_HEADERS: [&str; 13] = [
    "Complaint ID",
    "Portal Name",
    "Category",
    "Department",
    "Date Lodged",
    "Expected Response Date",
    "Computed Due Date",
    "Status",
    "Days Pending",
    "Days Until Next Action",
    "Description",
    "Notes",
    "Last Updated",
];

fn export_error(e: impl std::fmt::Display) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write CSV export: {e}"),
    }
}

fn to_row(view: &ComplaintResponse) -> [String; 13] {
    let complaint = &view.complaint;
    [
        complaint.complaint_id.clone(),
        complaint.portal_name.clone(),
        complaint.category.as_str().to_string(),
        complaint.department.clone(),
        complaint.date_lodged.clone(),
        complaint.expected_response_date.clone().unwrap_or_default(),
        view.due_date.clone().unwrap_or_default(),
        view.display_status.as_str().to_string(),
        view.days_pending.map(|d| d.to_string()).unwrap_or_default(),
        view.days_until_due
            .map(|d| d.to_string())
            .unwrap_or_default(),
        complaint.description.clone(),
        complaint.notes.clone(),
        complaint.last_updated.clone(),
    ]
}

/// Renders complaint views as CSV, header row first.
///
/// Fields containing commas, quotes or newlines are quoted.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_csv(views: &[ComplaintResponse]) -> Result<String, ApiError> {
    let mut writer: Writer<Vec<u8>> = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS).map_err(export_error)?;
    for view in views {
        writer.write_record(to_row(view)).map_err(export_error)?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(export_error)?;
    String::from_utf8(bytes).map_err(export_error)
}

/// Exports every complaint in list order.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_csv<R, C, A>(store: &ComplaintStore<R, C, A>, today: Date) -> Result<String, ApiError>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    render_csv(&list_complaints(store, today))
}
