// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Portal name is empty or invalid.
    InvalidPortalName(String),
    /// Portal-assigned complaint reference is empty or invalid.
    InvalidComplaintId(String),
    /// Status label is not part of the closed status enumeration.
    InvalidStatus(String),
    /// A date field could not be parsed.
    InvalidDate {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// Failed to render a timestamp.
    TimestampFormat {
        /// The formatting error message.
        error: String,
    },
    /// Another complaint already uses this portal name and reference.
    DuplicateComplaint {
        /// The normalized natural key.
        key: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPortalName(msg) => write!(f, "Invalid portal name: {msg}"),
            Self::InvalidComplaintId(msg) => write!(f, "Invalid complaint id: {msg}"),
            Self::InvalidStatus(status) => write!(f, "Invalid complaint status: '{status}'"),
            Self::InvalidDate { field, value } => {
                write!(f, "Invalid date for {field}: '{value}'")
            }
            Self::TimestampFormat { error } => {
                write!(f, "Failed to format timestamp: {error}")
            }
            Self::DuplicateComplaint { key } => {
                write!(f, "A complaint with key '{key}' already exists")
            }
        }
    }
}

impl std::error::Error for DomainError {}
