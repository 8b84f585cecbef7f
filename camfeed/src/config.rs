//! Configuration types and defaults

use crate::error::{CaptureError, CaptureResult};
use camfeed_media::StreamConstraints;
use serde::{Deserialize, Serialize};

/// Capture controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capabilities requested from the host
    pub constraints: StreamConstraints,
    /// Capacity of the capture event broadcast
    pub event_buffer_size: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            constraints: StreamConstraints::camera_only(),
            event_buffer_size: 32,
        }
    }
}

impl CaptureConfig {
    /// Validate configuration
    pub fn validate(&self) -> CaptureResult<()> {
        if !self.constraints.video {
            return Err(CaptureError::InvalidConfiguration {
                message: "Video must be requested".to_string(),
            });
        }

        if self.event_buffer_size == 0 {
            return Err(CaptureError::InvalidConfiguration {
                message: "Event buffer size must be > 0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.constraints, StreamConstraints::camera_only());
        assert_eq!(config.event_buffer_size, 32);
    }

    #[test]
    fn test_config_rejects_audio_only() {
        let config = CaptureConfig {
            constraints: StreamConstraints {
                video: false,
                audio: true,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CaptureError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_config_rejects_zero_buffer() {
        let config = CaptureConfig {
            event_buffer_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: CaptureConfig = serde_json::from_str(r#"{"event_buffer_size": 8}"#).unwrap();
        assert_eq!(config.event_buffer_size, 8);
        assert!(config.constraints.video);
        assert!(!config.constraints.audio);
    }
}
