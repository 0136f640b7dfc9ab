// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// The kind of complaint being tracked.
///
/// Unrecognized categories deserialize as `Other`, which carries the
/// shortest statutory window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// Right to Information request.
    #[serde(rename = "RTI")]
    Rti,
    /// Public grievance.
    Grievance,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Rti, Self::Grievance, Self::Other];

    /// Returns the wire label of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rti => "RTI",
            Self::Grievance => "Grievance",
            Self::Other => "Other",
        }
    }

    /// Parses a category label, falling back to `Other` for anything unknown.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "RTI" => Self::Rti,
            "Grievance" => Self::Grievance,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored lifecycle state of a complaint.
///
/// `Closed` and `Resolved` are terminal; every other state may move freely
/// to any other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ComplaintStatus {
    /// Drafted or filed, not yet acknowledged by the portal.
    Filed,
    /// Accepted by the portal.
    #[default]
    Submitted,
    /// Awaiting action by the office.
    Pending,
    /// Being worked on by the office.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Moved to another office or department. The label keeps the portals'
    /// spelling.
    Transfered,
    /// Assigned to an officer.
    Assigned,
    /// Under first appeal; the deadline counts from the last update.
    #[serde(rename = "First Appeal")]
    FirstAppeal,
    /// Under second appeal; the deadline counts from the last update.
    #[serde(rename = "Second Appeal")]
    SecondAppeal,
    /// Closed by the office. Terminal.
    Closed,
    /// Resolved. Terminal.
    Resolved,
}

impl ComplaintStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::Filed,
        Self::Submitted,
        Self::Pending,
        Self::InProgress,
        Self::Transfered,
        Self::Assigned,
        Self::FirstAppeal,
        Self::SecondAppeal,
        Self::Closed,
        Self::Resolved,
    ];

    /// Returns the wire label of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Filed => "Filed",
            Self::Submitted => "Submitted",
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Transfered => "Transfered",
            Self::Assigned => "Assigned",
            Self::FirstAppeal => "First Appeal",
            Self::SecondAppeal => "Second Appeal",
            Self::Closed => "Closed",
            Self::Resolved => "Resolved",
        }
    }

    /// Returns true if no further deadline applies in this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Resolved)
    }

    /// Returns true for the appeal stages, whose deadline runs from the
    /// date the complaint entered the appeal.
    #[must_use]
    pub const fn is_appeal(&self) -> bool {
        matches!(self, Self::FirstAppeal | Self::SecondAppeal)
    }
}

impl FromStr for ComplaintStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status as shown to a user.
///
/// `Overdue` is computed on read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    /// The stored status, shown unchanged.
    Stored(ComplaintStatus),
    /// A non-terminal complaint past its due date.
    Overdue,
}

impl DisplayStatus {
    /// Returns the label shown for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stored(status) => status.as_str(),
            Self::Overdue => "Overdue",
        }
    }

    /// Returns true if the underlying stored status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        match self {
            Self::Stored(status) => status.is_terminal(),
            Self::Overdue => false,
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DisplayStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DisplayStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label: String = String::deserialize(deserializer)?;
        if label == "Overdue" {
            return Ok(Self::Overdue);
        }
        label
            .parse::<ComplaintStatus>()
            .map(Self::Stored)
            .map_err(serde::de::Error::custom)
    }
}

/// Metadata for an attachment owned by a complaint.
///
/// The blob itself lives in a separate attachment store keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub id: String,
    pub name: String,
    /// MIME type of the blob.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// RFC 3339 timestamp of when the attachment was added.
    pub added_at: String,
}

/// Portal-specific extended details captured alongside a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionDetails {
    pub token_id: String,
    pub district: String,
    pub portal_status: String,
    pub complaint_date_time: String,
    pub cpgrams_status_check: String,
    pub cpgrams_registration_no: String,
    pub cpgrams_reg_token: String,
    pub office_department: String,
    pub office_name: String,
    pub officer_desk: String,
    pub office_contact: String,
    pub office_email: String,
    pub reminder: String,
    pub grievance_category_path: String,
    pub ministry_organisation: String,
    pub state_name: String,
    pub highway_number: String,
    pub stretch_details: String,
    pub grievance_narrative: String,
}

/// A tracked complaint.
///
/// Dates are kept as received (`YYYY-MM-DD` for calendar dates, RFC 3339 for
/// timestamps) and parsed on demand, so a malformed value degrades a single
/// computation instead of rejecting the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Opaque identifier, assigned once and never changed.
    pub id: String,
    /// Portal-assigned reference number.
    pub complaint_id: String,
    #[serde(default)]
    pub complaint_name: String,
    pub portal_name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    /// Calendar date the complaint was filed.
    pub date_lodged: String,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub office_email: String,
    #[serde(default)]
    pub office_phone: String,
    /// Explicit due date overriding the statutory timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_response_date: Option<String>,
    #[serde(default)]
    pub documents: Vec<AttachmentRef>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_data: Option<SectionDetails>,
    /// Timestamp of the last mutation.
    pub last_updated: String,
    /// Set exactly while the status is terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

impl Complaint {
    /// Returns the deduplication key of this complaint.
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(&self.portal_name, &self.complaint_id)
    }

    /// Returns true if the stored status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Input for creating a complaint.
///
/// `id` and `resolved_at` are honored when supplied; everything else
/// defaults the way the intake form does.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComplaintDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub complaint_id: String,
    pub complaint_name: String,
    pub portal_name: String,
    pub category: Category,
    pub description: String,
    /// Defaults to the creation date when blank.
    pub date_lodged: String,
    pub status: ComplaintStatus,
    pub department: String,
    pub office_email: String,
    pub office_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_response_date: Option<String>,
    pub documents: Vec<AttachmentRef>,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_data: Option<SectionDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

/// A partial update to a complaint.
///
/// An empty `expected_response_date` clears the explicit due date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComplaintPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_lodged: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_response_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<AttachmentRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_data: Option<SectionDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

/// Deduplication key identifying a real-world complaint across sources.
///
/// Built from the portal name and the portal reference, each trimmed and
/// lowercased, so `"P"`/`"1"` and `" p "`/`" 1 "` are the same complaint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NaturalKey {
    value: String,
}

impl NaturalKey {
    /// Creates a key from a portal name and a portal reference.
    #[must_use]
    pub fn new(portal_name: &str, complaint_id: &str) -> Self {
        Self {
            value: format!(
                "{}::{}",
                portal_name.trim().to_lowercase(),
                complaint_id.trim().to_lowercase()
            ),
        }
    }

    /// Returns the normalized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Record of a single import or feed synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRun {
    /// Database identifier, `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Where the records came from (a feed name or an import file).
    pub source: String,
    /// Outcome label, e.g. `ok`, `skipped` or `failed`.
    pub status: String,
    pub count_imported: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: String,
}
