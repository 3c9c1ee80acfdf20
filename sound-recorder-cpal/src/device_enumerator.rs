//! Input device enumeration over the default cpal host.
//!
//! Device names double as identifiers: cpal exposes no stable device ID
//! across hosts, so lookups match on the name reported by the host.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host, SampleFormat, SampleRate, SupportedStreamConfig};

use sound_recorder_core::RecorderError;

/// Sample formats the capture stream can convert to i16.
const CONVERTIBLE_FORMATS: [SampleFormat; 3] =
    [SampleFormat::I16, SampleFormat::F32, SampleFormat::U16];

/// Input device enumerator for the default cpal host.
pub struct DeviceEnumerator {
    host: Host,
}

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// Whether the host exposes at least one input device.
    pub fn has_capture_devices(&self) -> bool {
        self.host
            .input_devices()
            .map(|mut devices| devices.next().is_some())
            .unwrap_or(false)
    }

    /// Names of all input devices, in host enumeration order.
    pub fn capture_device_names(&self) -> Vec<String> {
        match self.host.input_devices() {
            Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
            Err(e) => {
                log::warn!("Failed to enumerate capture devices: {}", e);
                Vec::new()
            }
        }
    }

    pub fn default_capture_device_name(&self) -> Option<String> {
        self.host
            .default_input_device()
            .and_then(|d| d.name().ok())
    }

    /// Find an input device by name. An empty name selects the default device.
    pub fn find_capture_device(&self, name: &str) -> Option<Device> {
        if name.is_empty() {
            return self.host.default_input_device();
        }

        self.host
            .input_devices()
            .ok()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
    }
}

impl Default for DeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the input configuration to capture `sample_rate` Hz from `device`.
///
/// Prefers mono over multi-channel, then native i16 over formats that need
/// converting. Fails if no configuration covers the requested rate.
pub(crate) fn select_input_config(
    device: &Device,
    sample_rate: u32,
) -> Result<SupportedStreamConfig, String> {
    let rate = SampleRate(sample_rate);
    let configs = device
        .supported_input_configs()
        .map_err(|e| format!("failed to query supported configurations: {}", e))?;

    configs
        .filter(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .filter(|range| CONVERTIBLE_FORMATS.contains(&range.sample_format()))
        .min_by_key(|range| {
            (
                range.channels() != 1,
                range.sample_format() != SampleFormat::I16,
                range.channels(),
            )
        })
        .map(|range| range.with_sample_rate(rate))
        .ok_or_else(|| format!("sample rate {} Hz is not supported", sample_rate))
}

/// Open-failure error for `name`.
pub(crate) fn open_failed(name: &str, reason: impl ToString) -> RecorderError {
    let device = if name.is_empty() { "<default>" } else { name };
    RecorderError::open_failed(device, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_is_consistent() {
        let enumerator = DeviceEnumerator::new();
        let names = enumerator.capture_device_names();
        assert_eq!(enumerator.has_capture_devices(), !names.is_empty());

        for name in &names {
            match enumerator.find_capture_device(name) {
                Some(device) => assert_eq!(device.name().ok().as_deref(), Some(name.as_str())),
                None => eprintln!("Warning: device '{}' disappeared during the test", name),
            }
        }
    }

    #[test]
    fn test_unknown_device_lookup() {
        let enumerator = DeviceEnumerator::new();
        assert!(enumerator.find_capture_device("NonExistentDevice123456789").is_none());
    }

    #[test]
    fn test_default_device_config() {
        let enumerator = DeviceEnumerator::new();
        let Some(device) = enumerator.find_capture_device("") else {
            eprintln!("Warning: no default capture device (expected in CI)");
            return;
        };

        match select_input_config(&device, 44_100) {
            Ok(config) => {
                assert_eq!(config.sample_rate(), SampleRate(44_100));
                assert!(config.channels() > 0);
                println!("Selected config: {:?}", config);
            }
            Err(e) => eprintln!("Warning: default device cannot capture at 44.1kHz: {}", e),
        }
    }

    #[test]
    fn test_open_failed_names_default_device() {
        match open_failed("", "gone") {
            RecorderError::DeviceOpenFailed { device, reason } => {
                assert_eq!(device, "<default>");
                assert_eq!(reason, "gone");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
