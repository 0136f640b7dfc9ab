// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::parse_calendar_date;
use crate::error::DomainError;
use crate::types::Complaint;

/// Validates the fields every complaint must carry.
///
/// This function checks required fields and date formats.
/// It does NOT check natural key uniqueness (that requires context).
///
/// # Arguments
///
/// * `portal_name` - The portal the complaint was filed on
/// * `complaint_id` - The portal-assigned reference
/// * `date_lodged` - The filing date
/// * `expected_response_date` - The explicit due date, if any
///
/// # Errors
///
/// Returns an error if:
/// - The portal name is blank
/// - The complaint id is blank
/// - The lodged date does not parse
/// - A non-empty expected response date does not parse
pub fn validate_complaint_fields(
    portal_name: &str,
    complaint_id: &str,
    date_lodged: &str,
    expected_response_date: Option<&str>,
) -> Result<(), DomainError> {
    // Rule: portal name and complaint id form the natural key
    if portal_name.trim().is_empty() {
        return Err(DomainError::InvalidPortalName(String::from(
            "Portal name cannot be empty",
        )));
    }

    if complaint_id.trim().is_empty() {
        return Err(DomainError::InvalidComplaintId(String::from(
            "Complaint id cannot be empty",
        )));
    }

    if parse_calendar_date(date_lodged).is_none() {
        return Err(DomainError::InvalidDate {
            field: "dateLodged",
            value: date_lodged.to_string(),
        });
    }

    // An empty explicit date means "use the statutory timeline"
    if let Some(expected) = expected_response_date.filter(|v| !v.trim().is_empty())
        && parse_calendar_date(expected).is_none()
    {
        return Err(DomainError::InvalidDate {
            field: "expectedResponseDate",
            value: expected.to_string(),
        });
    }

    Ok(())
}

/// Validates a complete complaint record.
///
/// # Errors
///
/// Returns an error if any field fails [`validate_complaint_fields`].
pub fn validate_complaint(complaint: &Complaint) -> Result<(), DomainError> {
    validate_complaint_fields(
        &complaint.portal_name,
        &complaint.complaint_id,
        &complaint.date_lodged,
        complaint.expected_response_date.as_deref(),
    )
}
