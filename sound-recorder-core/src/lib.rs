//! # sound-recorder-core
//!
//! Platform-agnostic continuous audio capture.
//!
//! A [`Recorder`] opens one capture device, polls it from a background thread
//! at a configurable interval and hands every batch of signed 16-bit mono
//! samples to a [`RecorderHandler`]. Platform backends (cpal) implement the
//! [`CaptureBackend`] trait and plug into the generic recorder.
//!
//! ## Architecture
//!
//! ```text
//! sound-recorder-core (this crate)
//! ├── traits/       ← CaptureBackend, CaptureDevice, RecorderHandler
//! ├── models/       ← RecorderError, RecorderState, RecorderConfig
//! ├── processing/   ← SampleBuffer, RingBuffer (device-side sample queue)
//! ├── registry/     ← device enumeration queries
//! └── session/      ← Recorder, DeviceSlot, capture thread
//! ```

pub mod models;
pub mod processing;
pub mod registry;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use models::config::{RecorderConfig, DEFAULT_PROCESSING_INTERVAL};
pub use models::error::RecorderError;
pub use models::state::RecorderState;
pub use processing::ring_buffer::RingBuffer;
pub use processing::sample_buffer::SampleBuffer;
pub use session::device_slot::DeviceSlot;
pub use session::recorder::Recorder;
pub use traits::capture_backend::{CaptureBackend, CaptureDevice, CaptureFormat};
pub use traits::recorder_handler::RecorderHandler;
