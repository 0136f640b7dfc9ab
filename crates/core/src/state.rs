// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::merge::dedupe;
use rti_tracker_domain::{AttachmentRef, Complaint, NaturalKey};

/// The ordered set of known complaints.
///
/// No two complaints share a natural key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    /// All complaints, newest insertions first.
    pub complaints: Vec<Complaint>,
}

impl State {
    /// Creates a new empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            complaints: Vec::new(),
        }
    }

    /// Creates a state from arbitrary records, deduplicating by natural key.
    #[must_use]
    pub fn from_complaints(complaints: Vec<Complaint>) -> Self {
        Self {
            complaints: dedupe(complaints),
        }
    }

    /// Finds a complaint by opaque id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id == id)
    }

    /// Finds a complaint by natural key.
    #[must_use]
    pub fn find_by_key(&self, key: &NaturalKey) -> Option<&Complaint> {
        self.complaints.iter().find(|c| &c.natural_key() == key)
    }

    /// Returns the number of complaints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    /// Returns true if there are no complaints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }

    /// Stores a record returned by an authoritative source.
    ///
    /// The record replaces the entry with the same id, else the entry with
    /// the same natural key, else it is inserted at the front.
    pub fn upsert(&mut self, complaint: Complaint) {
        let key: NaturalKey = complaint.natural_key();
        let position: Option<usize> = self
            .complaints
            .iter()
            .position(|c| c.id == complaint.id)
            .or_else(|| self.complaints.iter().position(|c| c.natural_key() == key));

        match position {
            Some(idx) => {
                if let Some(slot) = self.complaints.get_mut(idx) {
                    *slot = complaint;
                }
            }
            None => self.complaints.insert(0, complaint),
        }

        self.complaints = dedupe(std::mem::take(&mut self.complaints));
    }
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new complaint was recorded.
    Created(Complaint),
    /// A create matched an existing natural key and was folded into it.
    Merged(Complaint),
    /// An existing complaint was modified.
    Updated(Complaint),
    /// A complaint was removed; its attachments must be released.
    Deleted {
        /// The removed complaint.
        complaint: Complaint,
        /// Attachments owned by the removed complaint.
        released: Vec<AttachmentRef>,
    },
    /// Every complaint was replaced.
    Replaced {
        /// Number of complaints after deduplication.
        count: usize,
    },
    /// Every complaint was removed.
    Cleared,
}

impl Change {
    /// Returns the complaint this change produced, if it produced one.
    #[must_use]
    pub const fn complaint(&self) -> Option<&Complaint> {
        match self {
            Self::Created(c) | Self::Merged(c) | Self::Updated(c) => Some(c),
            Self::Deleted { .. } | Self::Replaced { .. } | Self::Cleared => None,
        }
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// What the transition did.
    pub change: Change,
}
