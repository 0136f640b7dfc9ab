// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rti_tracker_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// No complaint has this opaque id.
    ComplaintNotFound(String),
    /// No attachment has this id.
    AttachmentNotFound(String),
    /// The attachment store could not accept or return a blob.
    AttachmentUnavailable(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::ComplaintNotFound(id) => write!(f, "Complaint '{id}' not found"),
            Self::AttachmentNotFound(id) => write!(f, "Attachment '{id}' not found"),
            Self::AttachmentUnavailable(msg) => write!(f, "Attachment store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
