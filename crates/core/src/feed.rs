// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Import of portal feeds produced by the scraping scripts.

use crate::merge::{COMPLAINT_ID_PREFIX, Reconciliation, reconcile_counted};
use crate::moment::{Moment, new_id};
use rti_tracker_domain::{Category, Complaint, ComplaintStatus, is_strict_iso_date};
use serde::{Deserialize, Serialize};

/// A feed document as written by a portal scraper.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<String>,
    pub complaints: Vec<FeedComplaint>,
}

/// One scraped complaint. Every field is optional free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedComplaint {
    pub complaint_id: Option<String>,
    pub complaint_name: Option<String>,
    pub description: Option<String>,
    pub date_lodged: Option<String>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub office_email: Option<String>,
    pub office_phone: Option<String>,
    pub expected_response_date: Option<String>,
    pub notes: Option<String>,
}

/// Describes how a feed's items map onto complaints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedProfile {
    /// Portal name given to imported complaints.
    pub portal_name: String,
    /// Portal names that count as this feed's records.
    pub aliases: Vec<String>,
    pub category: Category,
    /// Name used when an item has none.
    pub default_name: String,
}

impl FeedProfile {
    /// The Smart UMC grievance portal feed.
    #[must_use]
    pub fn smart_umc() -> Self {
        Self {
            portal_name: String::from("Smart_UMC_Grievances"),
            aliases: vec![
                String::from("Smart_UMC_Grievances"),
                String::from("UMC_Grievances"),
            ],
            category: Category::Grievance,
            default_name: String::from("UMC Grievance"),
        }
    }

    /// Returns true if the complaint was filed on this feed's portal.
    #[must_use]
    pub fn owns(&self, complaint: &Complaint) -> bool {
        self.aliases.iter().any(|alias| *alias == complaint.portal_name)
    }
}

/// Maps a scraped status label onto the closed status enumeration.
///
/// Exact labels are kept. Otherwise a few keywords are recognized
/// case-insensitively, and anything else is `Submitted`.
#[must_use]
pub fn normalize_status(raw: Option<&str>) -> ComplaintStatus {
    let Some(cleaned) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return ComplaintStatus::Submitted;
    };

    if let Ok(exact) = cleaned.parse::<ComplaintStatus>() {
        return exact;
    }

    let lowered: String = cleaned.to_lowercase();
    if lowered.contains("resolve") || lowered.contains("closed") {
        ComplaintStatus::Resolved
    } else if lowered.contains("progress") {
        ComplaintStatus::InProgress
    } else if lowered.contains("assign") {
        ComplaintStatus::Assigned
    } else if lowered.contains("pend") {
        ComplaintStatus::Pending
    } else {
        ComplaintStatus::Submitted
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Converts a feed item into a complaint, or `None` when it has no id.
///
/// Dates are only taken when written exactly as `YYYY-MM-DD`; a missing
/// lodged date becomes today.
#[must_use]
pub fn feed_item_to_complaint(
    item: FeedComplaint,
    profile: &FeedProfile,
    now: &Moment,
) -> Option<Complaint> {
    let complaint_id: String = trimmed(item.complaint_id);
    if complaint_id.is_empty() {
        return None;
    }

    let status: ComplaintStatus = normalize_status(item.status.as_deref());
    let complaint_name: String = Some(trimmed(item.complaint_name))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| profile.default_name.clone());

    Some(Complaint {
        id: new_id(COMPLAINT_ID_PREFIX),
        complaint_id,
        complaint_name,
        portal_name: profile.portal_name.clone(),
        category: profile.category,
        description: trimmed(item.description),
        date_lodged: item
            .date_lodged
            .filter(|v| is_strict_iso_date(v))
            .unwrap_or_else(|| now.date_string()),
        status,
        department: trimmed(item.department),
        office_email: trimmed(item.office_email),
        office_phone: trimmed(item.office_phone),
        expected_response_date: item
            .expected_response_date
            .filter(|v| is_strict_iso_date(v)),
        documents: Vec::new(),
        notes: trimmed(item.notes),
        section_data: None,
        last_updated: now.timestamp().to_string(),
        resolved_at: status.is_terminal().then(|| now.timestamp().to_string()),
    })
}

/// The result of reconciling a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSync {
    /// The feed was already imported; nothing changed.
    Skipped,
    /// The feed was reconciled into the existing set.
    Applied {
        /// The full reconciled set.
        complaints: Vec<Complaint>,
        /// Number of complaints that did not exist before.
        imported: usize,
        /// Checkpoint to store for the next sync, if the feed carried one.
        checkpoint: Option<String>,
    },
}

/// Reconciles a feed into the existing complaints.
///
/// Skipped unless `force` is set, when the feed's `syncedAt` equals the
/// stored checkpoint and the profile's portal already has records.
///
/// # Arguments
///
/// * `existing` - The current complaints
/// * `feed` - The feed document
/// * `profile` - How feed items map onto complaints
/// * `checkpoint` - The `syncedAt` value stored by the previous sync
/// * `force` - Import even if the feed looks already imported
/// * `now` - The instant of the sync
#[must_use]
pub fn sync_from_feed(
    existing: &[Complaint],
    feed: Feed,
    profile: &FeedProfile,
    checkpoint: Option<&str>,
    force: bool,
    now: &Moment,
) -> FeedSync {
    let synced_at: Option<String> = feed
        .synced_at
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let already_imported: bool = synced_at.is_some()
        && synced_at.as_deref() == checkpoint
        && existing.iter().any(|c| profile.owns(c));
    if !force && already_imported {
        return FeedSync::Skipped;
    }

    let incoming: Vec<Complaint> = feed
        .complaints
        .into_iter()
        .filter_map(|item| feed_item_to_complaint(item, profile, now))
        .collect();

    let Reconciliation {
        complaints,
        inserted,
        ..
    } = reconcile_counted(existing, incoming);

    FeedSync::Applied {
        complaints,
        imported: inserted,
        checkpoint: synced_at,
    }
}
