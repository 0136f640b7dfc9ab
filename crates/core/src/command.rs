// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rti_tracker_domain::{Complaint, ComplaintDraft, ComplaintPatch};

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a new complaint, or fold it into the one sharing its natural key.
    Create(ComplaintDraft),
    /// Change fields of an existing complaint.
    Update {
        /// The opaque id of the complaint.
        id: String,
        /// The fields to change.
        patch: ComplaintPatch,
    },
    /// Remove a complaint and release its attachments.
    Delete {
        /// The opaque id of the complaint.
        id: String,
    },
    /// Replace every complaint, deduplicating by natural key.
    ReplaceAll(Vec<Complaint>),
    /// Remove every complaint.
    Clear,
}
