use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interval between two polls of the capture device when not configured.
pub const DEFAULT_PROCESSING_INTERVAL: Duration = Duration::from_millis(100);

/// Recorder configuration.
///
/// The sample rate is not part of it: it is chosen per session by
/// `Recorder::start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Capture device name, or None (or empty) for the platform default.
    pub device: Option<String>,

    /// Delay between two polls of the capture device (default: 100ms).
    #[serde(rename = "processing_interval_ms", with = "duration_millis")]
    pub processing_interval: Duration,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.processing_interval.is_zero() {
            return Err("processing interval must be positive".into());
        }
        Ok(())
    }

    /// The configured device name, with the empty string treated as unset.
    pub fn device_name(&self) -> Option<&str> {
        self.device.as_deref().filter(|name| !name.is_empty())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device: None,
            processing_interval: DEFAULT_PROCESSING_INTERVAL,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
