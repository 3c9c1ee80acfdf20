//! # sound-recorder-cpal
//!
//! Cross-platform capture backend for sound-recorder, built on cpal.
//!
//! Provides:
//! - `CpalBackend`: `CaptureBackend` over the default cpal host
//! - `CpalCaptureDevice`: an open input stream feeding a sample queue
//! - `DeviceEnumerator`: input device listing and lookup
//!
//! ## Usage
//! ```no_run
//! use sound_recorder_cpal::CpalBackend;
//! use sound_recorder_core::Recorder;
//!
//! let mut recorder = Recorder::new(CpalBackend, |samples: &[i16]| {
//!     println!("captured {} samples", samples.len());
//!     true
//! });
//! recorder.start(44_100).unwrap();
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! recorder.stop();
//! ```

pub mod backend;
pub mod cpal_capture;
pub mod device_enumerator;

pub use backend::{CpalBackend, CpalRecorder};
pub use cpal_capture::CpalCaptureDevice;
pub use device_enumerator::DeviceEnumerator;
