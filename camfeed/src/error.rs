//! Error types for camfeed

use thiserror::Error;

/// Main error type for capture controller operations
///
/// Acquisition failures never surface here; they are reported through the
/// error signal instead.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Controller has been torn down
    #[error("Capture controller already released")]
    Released,

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Logging or runtime setup failed
    #[error("Initialization failed: {reason}")]
    Initialization {
        /// Reason for initialization failure
        reason: String,
    },
}

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CaptureError::Released.to_string(),
            "Capture controller already released"
        );

        let error = CaptureError::InvalidConfiguration {
            message: "event_buffer_size must be > 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: event_buffer_size must be > 0"
        );
    }
}
