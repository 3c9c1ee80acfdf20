//! Scripted capture backend and handler used by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::error::RecorderError;
use crate::processing::ring_buffer::RingBuffer;
use crate::session::device_slot::DeviceSlot;
use crate::traits::capture_backend::{CaptureBackend, CaptureDevice, CaptureFormat};
use crate::traits::recorder_handler::RecorderHandler;

/// Poll `condition` until it holds or two seconds pass.
pub(crate) fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Fake platform: a device list, a sample queue fed by the test, and
/// counters for every call the recorder makes.
pub(crate) struct MockHost {
    supported: AtomicBool,
    devices: Mutex<Vec<String>>,
    queue: Mutex<RingBuffer>,
    opens: AtomicUsize,
    closes: AtomicUsize,
    started: AtomicBool,
    stopped: AtomicBool,
    fail_start: AtomicBool,
    last_opened: Mutex<Option<String>>,
    last_format: Mutex<Option<CaptureFormat>>,
}

impl MockHost {
    pub(crate) fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::SeqCst);
    }

    pub(crate) fn add_device(&self, name: &str) {
        self.devices.lock().push(name.to_string());
    }

    /// Make samples available to the open device.
    pub(crate) fn push(&self, samples: &[i16]) {
        self.queue.lock().write(samples);
    }

    pub(crate) fn fail_hardware_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn hardware_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn hardware_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub(crate) fn last_opened(&self) -> Option<String> {
        self.last_opened.lock().clone()
    }

    pub(crate) fn last_format(&self) -> Option<CaptureFormat> {
        *self.last_format.lock()
    }
}

/// Backend over a [`MockHost`], with its own device slot so tests can run
/// in parallel without contending for the process-wide one.
#[derive(Clone)]
pub(crate) struct MockBackend {
    host: Arc<MockHost>,
    slot: Arc<DeviceSlot>,
}

impl MockBackend {
    /// The first device is the default one.
    pub(crate) fn new(devices: &[&str]) -> Self {
        let host = MockHost {
            supported: AtomicBool::new(true),
            devices: Mutex::new(devices.iter().map(|d| d.to_string()).collect()),
            queue: Mutex::new(RingBuffer::new(48_000)),
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            last_opened: Mutex::new(None),
            last_format: Mutex::new(None),
        };
        Self {
            host: Arc::new(host),
            slot: Arc::new(DeviceSlot::new()),
        }
    }

    pub(crate) fn host(&self) -> &MockHost {
        &self.host
    }

    pub(crate) fn slot(&self) -> Arc<DeviceSlot> {
        Arc::clone(&self.slot)
    }
}

impl CaptureBackend for MockBackend {
    type Device = MockDevice;

    fn is_capture_supported(&self) -> bool {
        self.host.supported.load(Ordering::SeqCst)
    }

    fn device_names(&self) -> Vec<String> {
        self.host.devices.lock().clone()
    }

    fn default_device_name(&self) -> String {
        self.host.devices.lock().first().cloned().unwrap_or_default()
    }

    fn open(&self, name: &str, format: CaptureFormat) -> Result<MockDevice, RecorderError> {
        let name = if name.is_empty() {
            self.default_device_name()
        } else {
            name.to_string()
        };
        if !self.host.devices.lock().contains(&name) {
            return Err(RecorderError::open_failed(name, "no such capture device"));
        }

        self.host.opens.fetch_add(1, Ordering::SeqCst);
        *self.host.last_opened.lock() = Some(name);
        *self.host.last_format.lock() = Some(format);
        Ok(MockDevice {
            host: Arc::clone(&self.host),
            closed: false,
        })
    }
}

pub(crate) struct MockDevice {
    host: Arc<MockHost>,
    closed: bool,
}

impl CaptureDevice for MockDevice {
    fn start(&mut self) -> Result<(), RecorderError> {
        if self.host.fail_start.load(Ordering::SeqCst) {
            return Err(RecorderError::DeviceStartFailed("device busy".into()));
        }
        self.host.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.host.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn available_samples(&self) -> usize {
        self.host.queue.lock().count()
    }

    fn read_samples(&mut self, out: &mut [i16]) -> usize {
        self.host.queue.lock().read_into(out)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.host.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Handler that records every call it receives.
#[derive(Debug, Default)]
pub(crate) struct Probe {
    pub starts: usize,
    pub stops: usize,
    pub batches: Vec<Vec<i16>>,
    pub reject_start: bool,
    pub stop_after_batches: Option<usize>,
    pub panic_on_samples: bool,
}

impl Probe {
    pub(crate) fn received(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub(crate) fn all_samples(&self) -> Vec<i16> {
        self.batches.concat()
    }
}

impl RecorderHandler for Probe {
    fn on_start(&mut self) -> bool {
        self.starts += 1;
        !self.reject_start
    }

    fn on_process_samples(&mut self, samples: &[i16]) -> bool {
        if self.panic_on_samples {
            panic!("handler failure");
        }
        self.batches.push(samples.to_vec());
        self.stop_after_batches.map_or(true, |limit| self.batches.len() < limit)
    }

    fn on_stop(&mut self) {
        self.stops += 1;
    }
}
