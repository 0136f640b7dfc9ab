// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use rti_tracker::CoreError;
use rti_tracker_domain::DomainError;
use rti_tracker_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidPortalName(msg) => ApiError::InvalidInput {
            field: String::from("portalName"),
            message: msg,
        },
        DomainError::InvalidComplaintId(msg) => ApiError::InvalidInput {
            field: String::from("complaintId"),
            message: msg,
        },
        DomainError::InvalidStatus(status) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown status '{status}'"),
        },
        DomainError::InvalidDate { field, value } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not a calendar date"),
        },
        DomainError::TimestampFormat { error } => ApiError::Internal {
            message: format!("Failed to format timestamp: {error}"),
        },
        DomainError::DuplicateComplaint { key } => ApiError::DomainRuleViolation {
            rule: String::from("unique_complaint"),
            message: format!("A complaint with key '{key}' already exists"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::ComplaintNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Complaint"),
            message: format!("Complaint '{id}' does not exist"),
        },
        CoreError::AttachmentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Document"),
            message: format!("Document '{id}' does not exist"),
        },
        CoreError::AttachmentUnavailable(msg) => ApiError::Internal {
            message: format!("Attachment store unavailable: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::RuleViolation(core_err) => translate_core_error(core_err),
        PersistenceError::ComplaintNotFound(id) => {
            translate_core_error(CoreError::ComplaintNotFound(id))
        }
        PersistenceError::DuplicateComplaint(key) => {
            translate_domain_error(DomainError::DuplicateComplaint { key })
        }
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
