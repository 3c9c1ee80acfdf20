use thiserror::Error;

/// Errors that can occur while starting or switching an audio capture.
///
/// Every failure is reported synchronously to the caller of the operation
/// that triggered it. The capture worker never surfaces errors on its own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("audio capture is not available on this system")]
    Unavailable,

    #[error("another audio capture is already running")]
    AlreadyCapturing,

    #[error("failed to open capture device '{device}': {reason}")]
    DeviceOpenFailed { device: String, reason: String },

    #[error("failed to start capture device: {0}")]
    DeviceStartFailed(String),

    #[error("failed to stop capture device: {0}")]
    DeviceStopFailed(String),

    #[error("capture start was rejected by the recorder handler")]
    StartRejected,

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn capture thread: {0}")]
    ThreadSpawnFailed(String),
}

impl RecorderError {
    /// Shorthand for a [`RecorderError::DeviceOpenFailed`].
    pub fn open_failed(device: impl Into<String>, reason: impl ToString) -> Self {
        Self::DeviceOpenFailed {
            device: device.into(),
            reason: reason.to_string(),
        }
    }
}
