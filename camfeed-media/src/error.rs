//! Media error types and handling
//!
//! This module defines the errors raised while acquiring a camera stream from
//! the host and while releasing its tracks.

use thiserror::Error;

/// Placeholder reason used when the host gives no failure message
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Main error type for media operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Host refused access to the camera (permission prompt declined, policy)
    #[error("Acquisition denied: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
    AcquisitionDenied {
        /// Host-provided failure message, if any
        message: Option<String>,
    },

    /// No usable camera (missing device, device busy, hardware fault)
    #[error("Acquisition unavailable: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
    AcquisitionUnavailable {
        /// Host-provided failure message, if any
        message: Option<String>,
    },

    /// A track did not stop cleanly
    #[error("Release failed for track {track_id}: {reason}")]
    ReleaseFailed {
        /// Track identifier
        track_id: String,
        /// Failure reason
        reason: String,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Permission refusal with the host's message
    pub fn denied(message: impl Into<String>) -> Self {
        MediaError::AcquisitionDenied {
            message: Some(message.into()),
        }
    }

    /// Device missing or busy, with the host's message
    pub fn unavailable(message: impl Into<String>) -> Self {
        MediaError::AcquisitionUnavailable {
            message: Some(message.into()),
        }
    }

    /// Underlying failure message, if the host supplied one
    pub fn reason(&self) -> Option<&str> {
        match self {
            MediaError::AcquisitionDenied { message }
            | MediaError::AcquisitionUnavailable { message } => message.as_deref(),
            MediaError::ReleaseFailed { reason, .. } => Some(reason),
            MediaError::InvalidConfiguration { message } => Some(message),
        }
    }

    /// Check if error is recoverable by a later, caller-initiated attempt
    pub fn is_recoverable(&self) -> bool {
        match self {
            MediaError::AcquisitionDenied { .. } => false,
            MediaError::AcquisitionUnavailable { .. } => true,
            MediaError::ReleaseFailed { .. } => true,
            MediaError::InvalidConfiguration { .. } => false,
        }
    }

    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            MediaError::AcquisitionDenied { .. } => ErrorCategory::Permission,
            MediaError::AcquisitionUnavailable { .. } => ErrorCategory::Device,
            MediaError::ReleaseFailed { .. } => ErrorCategory::Release,
            MediaError::InvalidConfiguration { .. } => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User or policy refused access
    Permission,
    /// Device and hardware errors
    Device,
    /// Track release errors
    Release,
    /// Configuration and parameter errors
    Configuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let denied = MediaError::denied("Permission denied");
        assert_eq!(denied.category(), ErrorCategory::Permission);
        assert!(!denied.is_recoverable());

        let busy = MediaError::unavailable("Device in use");
        assert_eq!(busy.category(), ErrorCategory::Device);
        assert!(busy.is_recoverable());

        let oversized = MediaError::InvalidConfiguration {
            message: "Drawing surface too large".to_string(),
        };
        assert_eq!(oversized.category(), ErrorCategory::Configuration);
        assert!(!oversized.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let error = MediaError::denied("Permission denied");
        assert_eq!(error.to_string(), "Acquisition denied: Permission denied");

        let error = MediaError::AcquisitionUnavailable { message: None };
        assert_eq!(error.to_string(), "Acquisition unavailable: Unknown error");
    }

    #[test]
    fn test_reason_without_message() {
        let error = MediaError::AcquisitionDenied { message: None };
        assert!(error.reason().is_none());

        let error = MediaError::ReleaseFailed {
            track_id: "t0".to_string(),
            reason: "ioctl failed".to_string(),
        };
        assert_eq!(error.reason(), Some("ioctl failed"));
    }
}
