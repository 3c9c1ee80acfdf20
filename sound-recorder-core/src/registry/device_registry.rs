//! Queries over the platform's capture devices.
//!
//! Nothing is cached: every call asks the backend again, so hot-plugged
//! devices show up on the next query.

use crate::traits::capture_backend::CaptureBackend;

/// Whether the backend can capture audio at all.
pub fn is_available<B: CaptureBackend + ?Sized>(backend: &B) -> bool {
    backend.is_capture_supported()
}

/// Names of the capture devices, in platform enumeration order.
///
/// Empty when capture is unsupported or no device is present.
pub fn available_devices<B: CaptureBackend + ?Sized>(backend: &B) -> Vec<String> {
    if !backend.is_capture_supported() {
        return Vec::new();
    }
    backend.device_names()
}

/// Name of the default capture device.
pub fn default_device<B: CaptureBackend + ?Sized>(backend: &B) -> String {
    backend.default_device_name()
}

/// Map a requested device name to the one to open: empty selects the default.
pub fn resolve_device<B: CaptureBackend + ?Sized>(backend: &B, name: &str) -> String {
    if name.is_empty() {
        default_device(backend)
    } else {
        name.to_string()
    }
}
