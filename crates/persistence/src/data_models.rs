// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to and from domain records.
//!
//! Attachment metadata and section details are stored as JSON text.

use diesel::prelude::*;
use rti_tracker_domain::{
    AttachmentRef, Category, Complaint, ComplaintStatus, SectionDetails, SyncRun,
};

use crate::diesel_schema::{complaints, sync_runs};
use crate::error::PersistenceError;

/// A complaint row as read from the database.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ComplaintRow {
    pub id: String,
    pub complaint_id: String,
    pub complaint_name: String,
    pub portal_name: String,
    pub category: String,
    pub description: String,
    pub date_lodged: String,
    pub status: String,
    pub department: String,
    pub office_email: String,
    pub office_phone: String,
    pub expected_response_date: Option<String>,
    pub documents: String,
    pub notes: String,
    pub section_data: Option<String>,
    pub last_updated: String,
    pub resolved_at: Option<String>,
}

impl ComplaintRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored status or a JSON column is malformed.
    pub fn into_complaint(self) -> Result<Complaint, PersistenceError> {
        let status: ComplaintStatus = self.status.parse().map_err(|e| {
            PersistenceError::SerializationError(format!("complaint {}: {e}", self.id))
        })?;
        let documents: Vec<AttachmentRef> = serde_json::from_str(&self.documents)?;
        let section_data: Option<SectionDetails> = self
            .section_data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Complaint {
            id: self.id,
            complaint_id: self.complaint_id,
            complaint_name: self.complaint_name,
            portal_name: self.portal_name,
            category: Category::parse_lenient(&self.category),
            description: self.description,
            date_lodged: self.date_lodged,
            status,
            department: self.department,
            office_email: self.office_email,
            office_phone: self.office_phone,
            expected_response_date: self.expected_response_date,
            documents,
            notes: self.notes,
            section_data,
            last_updated: self.last_updated,
            resolved_at: self.resolved_at,
        })
    }
}

/// A complaint row as written to the database.
///
/// `None` columns are written as `NULL` so a cleared due date stays cleared.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = complaints)]
#[diesel(treat_none_as_null = true)]
pub struct ComplaintRecord {
    pub id: String,
    pub complaint_id: String,
    pub complaint_name: String,
    pub portal_name: String,
    pub natural_key: String,
    pub category: String,
    pub description: String,
    pub date_lodged: String,
    pub status: String,
    pub department: String,
    pub office_email: String,
    pub office_phone: String,
    pub expected_response_date: Option<String>,
    pub documents: String,
    pub notes: String,
    pub section_data: Option<String>,
    pub last_updated: String,
    pub resolved_at: Option<String>,
}

impl ComplaintRecord {
    /// Builds the row for a domain record.
    ///
    /// # Errors
    ///
    /// Returns an error if a JSON column cannot be serialized.
    pub fn from_complaint(complaint: &Complaint) -> Result<Self, PersistenceError> {
        let section_data: Option<String> = complaint
            .section_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(Self {
            id: complaint.id.clone(),
            complaint_id: complaint.complaint_id.clone(),
            complaint_name: complaint.complaint_name.clone(),
            portal_name: complaint.portal_name.clone(),
            natural_key: complaint.natural_key().to_string(),
            category: complaint.category.as_str().to_string(),
            description: complaint.description.clone(),
            date_lodged: complaint.date_lodged.clone(),
            status: complaint.status.as_str().to_string(),
            department: complaint.department.clone(),
            office_email: complaint.office_email.clone(),
            office_phone: complaint.office_phone.clone(),
            expected_response_date: complaint.expected_response_date.clone(),
            documents: serde_json::to_string(&complaint.documents)?,
            notes: complaint.notes.clone(),
            section_data,
            last_updated: complaint.last_updated.clone(),
            resolved_at: complaint.resolved_at.clone(),
        })
    }
}

/// A sync run row as read from the database.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = sync_runs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncRunRow {
    pub id: i64,
    pub source: String,
    pub status: String,
    pub count_imported: i32,
    pub message: Option<String>,
    pub created_at: String,
}

impl From<SyncRunRow> for SyncRun {
    fn from(row: SyncRunRow) -> Self {
        Self {
            id: Some(row.id),
            source: row.source,
            status: row.status,
            count_imported: u32::try_from(row.count_imported).unwrap_or(0),
            message: row.message,
            created_at: row.created_at,
        }
    }
}

/// A sync run row as written to the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = sync_runs)]
pub struct NewSyncRun<'a> {
    pub source: &'a str,
    pub status: &'a str,
    pub count_imported: i32,
    pub message: Option<&'a str>,
    pub created_at: &'a str,
}

impl<'a> From<&'a SyncRun> for NewSyncRun<'a> {
    fn from(run: &'a SyncRun) -> Self {
        Self {
            source: &run.source,
            status: &run.status,
            count_imported: i32::try_from(run.count_imported).unwrap_or(i32::MAX),
            message: run.message.as_deref(),
            created_at: &run.created_at,
        }
    }
}
