//! Unified error system for Depot
//!
//! A single error type shared by every Depot crate. Downstream crates
//! re-export `DepotError`/`DepotResult` instead of defining their own.

use serde::{Deserialize, Serialize};

/// Unified error type for all Depot operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DepotError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Bit-codec offset outside the field width, or odd
    #[error("Invalid offset: {message}")]
    InvalidOffset {
        /// Error message describing the offset violation
        message: String,
    },

    /// Ancestry comparison between different node kinds
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        /// Error message naming the two kinds involved
        message: String,
    },

    /// A parent-link mutation or ancestor walk hit a cycle
    #[error("Cycle detected: {message}")]
    CycleDetected {
        /// Error message locating the cycle
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Optimistic write lost the race; caller should re-read and retry
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message describing the stale expectation
        message: String,
    },

    /// Storage collaborator failure, propagated unchanged
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Internal invariant breakage
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl DepotError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an invalid offset error
    pub fn invalid_offset(message: impl Into<String>) -> Self {
        Self::InvalidOffset {
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a cycle detected error
    pub fn cycle_detected(message: impl Into<String>) -> Self {
        Self::CycleDetected {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for Depot operations
pub type DepotResult<T> = std::result::Result<T, DepotError>;

impl From<std::io::Error> for DepotError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DepotError::type_mismatch("Category vs StorageLocation");
        assert_eq!(
            format!("{err}"),
            "Type mismatch: Category vs StorageLocation"
        );
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing row");
        let err: DepotError = io.into();
        assert!(matches!(err, DepotError::NotFound { .. }));
    }

    #[test]
    fn test_io_other_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection lost");
        let err: DepotError = io.into();
        assert!(matches!(err, DepotError::Storage { .. }));
    }
}
