use crate::models::error::RecorderError;

/// Sample layout requested from a capture device.
///
/// The recorder only ever asks for 16-bit mono; the fields exist so that
/// backends can validate what they are asked to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl CaptureFormat {
    /// Signed 16-bit mono at `sample_rate`.
    pub fn mono16(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

/// An open capture session on one input device.
///
/// Created by [`CaptureBackend::open`]. The recorder moves it to its capture
/// thread, so every method is called from that thread only.
pub trait CaptureDevice: Send + 'static {
    /// Begin filling the device's internal sample queue.
    fn start(&mut self) -> Result<(), RecorderError>;

    /// Stop capturing. Samples already queued stay readable.
    fn stop(&mut self) -> Result<(), RecorderError>;

    /// Number of samples that can be read right now.
    fn available_samples(&self) -> usize;

    /// Move up to `out.len()` queued samples into `out`, oldest first.
    /// Returns how many were written.
    fn read_samples(&mut self, out: &mut [i16]) -> usize;

    /// Release the device. Must be idempotent.
    fn close(&mut self);
}

/// Interface to a platform capture API.
///
/// Implemented by:
/// - `CpalBackend` (sound-recorder-cpal)
pub trait CaptureBackend: Send + Sync + 'static {
    type Device: CaptureDevice;

    /// Whether the platform supports audio capture at all.
    fn is_capture_supported(&self) -> bool;

    /// Names of the capture devices, in platform enumeration order.
    fn device_names(&self) -> Vec<String>;

    /// Name of the platform default capture device (empty if there is none).
    fn default_device_name(&self) -> String;

    /// Open `name` for capture. An empty name selects the default device.
    fn open(&self, name: &str, format: CaptureFormat) -> Result<Self::Device, RecorderError>;
}
