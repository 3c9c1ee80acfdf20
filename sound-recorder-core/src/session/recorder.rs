use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;
use crate::processing::sample_buffer::SampleBuffer;
use crate::registry::device_registry;
use crate::session::device_slot::{DeviceSlot, SlotClaim};
use crate::session::polling;
use crate::session::shared::{OpenDevice, SessionShared};
use crate::traits::capture_backend::{CaptureBackend, CaptureDevice, CaptureFormat};
use crate::traits::recorder_handler::RecorderHandler;

const CAPTURE_THREAD_NAME: &str = "sound-recorder-capture";

/// Continuous audio capture from one input device.
///
/// Owns the open/close lifecycle of a capture device and a background thread
/// that polls it every processing interval, handing each batch of 16-bit mono
/// samples to a [`RecorderHandler`].
///
/// ```text
/// start() → open device → on_start() → hardware start → [capture thread]
///                                                          │ poll + on_process_samples
/// stop()  → signal ─────────────────────────────────────→ stop hw, final flush, close
///         → join → on_stop()
/// ```
///
/// Only one capture device may be open at a time across every recorder that
/// shares a [`DeviceSlot`] (the process-wide one by default).
pub struct Recorder<B: CaptureBackend, H: RecorderHandler> {
    backend: B,
    handler: Arc<Mutex<H>>,
    slot: Arc<DeviceSlot>,
    shared: Arc<SessionShared>,
    device_name: String,
    sample_rate: u32,

    // Lent to the capture thread while a session runs
    samples: Option<SampleBuffer>,
    worker: Option<thread::JoinHandle<SampleBuffer>>,
}

impl<B: CaptureBackend, H: RecorderHandler> Recorder<B, H> {
    /// Recorder on the default device, polling every 100ms.
    pub fn new(backend: B, handler: H) -> Self {
        let config = RecorderConfig::default();
        let device_name = device_registry::default_device(&backend);
        Self {
            backend,
            handler: Arc::new(Mutex::new(handler)),
            slot: DeviceSlot::global(),
            shared: Arc::new(SessionShared::new(config.processing_interval)),
            device_name,
            sample_rate: 0,
            samples: Some(SampleBuffer::new()),
            worker: None,
        }
    }

    pub fn with_config(
        backend: B,
        handler: H,
        config: RecorderConfig,
    ) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::InvalidConfig)?;

        let mut recorder = Self::new(backend, handler);
        if let Some(name) = config.device_name() {
            recorder.device_name = name.to_string();
        }
        recorder.set_processing_interval(config.processing_interval);
        Ok(recorder)
    }

    /// Arbitrate device ownership through `slot` instead of the process-wide one.
    pub fn with_slot(mut self, slot: Arc<DeviceSlot>) -> Self {
        self.slot = slot;
        self
    }

    pub fn is_available(&self) -> bool {
        device_registry::is_available(&self.backend)
    }

    pub fn available_devices(&self) -> Vec<String> {
        device_registry::available_devices(&self.backend)
    }

    pub fn default_device(&self) -> String {
        device_registry::default_device(&self.backend)
    }

    /// Start capturing at `sample_rate` Hz from the configured device.
    ///
    /// Fails without side effects if capture is unsupported, if another
    /// device is already open, or if the device cannot be opened. When the
    /// handler's `on_start` declines, the freshly opened device is closed
    /// again and no capture thread is launched.
    pub fn start(&mut self, sample_rate: u32) -> Result<(), RecorderError> {
        self.reap_finished_session();

        if !self.is_available() {
            log::error!("Failed to start capture: this system cannot capture audio data");
            return Err(RecorderError::Unavailable);
        }

        if sample_rate == 0 {
            log::error!("Failed to start capture: sample rate must be positive");
            return Err(RecorderError::InvalidSampleRate(sample_rate));
        }

        let claim = self.claim_slot()?;
        let device_name = self.device_name.clone();
        let device = self.open_device(&device_name, sample_rate, claim)?;

        let mut samples = self.samples.take().unwrap_or_default();
        samples.clear();
        self.sample_rate = sample_rate;

        if !self.handler.lock().on_start() {
            log::warn!("Audio capture start rejected by the recorder handler");
            drop(device);
            self.samples = Some(samples);
            return Err(RecorderError::StartRejected);
        }

        self.launch(device, samples)?;
        log::info!("Audio capture started on '{}' at {} Hz", self.device_name, sample_rate);
        Ok(())
    }

    /// Stop capturing and wait until the device is released.
    ///
    /// Once this returns, the handler will not see any more samples.
    /// `on_stop` is called on every invocation, including when already idle.
    pub fn stop(&mut self) {
        self.shared.set_running(false);
        self.join_worker();
        self.handler.lock().on_stop();
        log::info!("Audio capture stopped");
    }

    /// Select the capture device. An empty name selects the default device.
    ///
    /// While capturing, the current session is stopped and capture resumes
    /// on the new device at the same sample rate. If that fails the recorder
    /// is left idle and the handler's `on_stop` is called.
    pub fn set_device(&mut self, name: &str) -> Result<(), RecorderError> {
        self.device_name = device_registry::resolve_device(&self.backend, name);

        if !self.shared.is_running() {
            self.reap_finished_session();
            return Ok(());
        }

        self.shared.set_running(false);
        self.join_worker();

        let device_name = self.device_name.clone();
        let device = self
            .claim_slot()
            .and_then(|claim| self.open_device(&device_name, self.sample_rate, claim));
        let device = match device {
            Ok(device) => device,
            Err(e) => {
                self.handler.lock().on_stop();
                return Err(e);
            }
        };

        let samples = self.samples.take().unwrap_or_default();
        if let Err(e) = self.launch(device, samples) {
            self.handler.lock().on_stop();
            return Err(e);
        }

        log::info!("Audio capture switched to '{}'", self.device_name);
        Ok(())
    }

    /// Name of the device used by the next (or current) session.
    pub fn device(&self) -> &str {
        &self.device_name
    }

    /// Sample rate of the current or last session, 0 before the first start.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn state(&self) -> RecorderState {
        self.shared.state()
    }

    pub fn is_capturing(&self) -> bool {
        self.state().is_capturing()
    }

    /// Whether this recorder currently holds an open capture device.
    pub fn is_device_open(&self) -> bool {
        self.shared.is_device_open()
    }

    pub fn processing_interval(&self) -> Duration {
        self.shared.processing_interval()
    }

    /// Change the delay between two polls. Takes effect from the next poll,
    /// including while capturing.
    pub fn set_processing_interval(&self, interval: Duration) {
        self.shared.set_processing_interval(interval);
    }

    /// Lock the handler.
    ///
    /// The capture thread locks it too for every batch, so keep the guard
    /// short while capturing.
    pub fn handler(&self) -> MutexGuard<'_, H> {
        self.handler.lock()
    }

    // --- Internal helpers ---

    fn claim_slot(&self) -> Result<SlotClaim, RecorderError> {
        self.slot.try_claim().ok_or_else(|| {
            log::error!("Trying to start audio capture, but another capture is already running");
            RecorderError::AlreadyCapturing
        })
    }

    fn open_device(
        &self,
        name: &str,
        sample_rate: u32,
        claim: SlotClaim,
    ) -> Result<OpenDevice<B::Device>, RecorderError> {
        match self.backend.open(name, CaptureFormat::mono16(sample_rate)) {
            Ok(device) => {
                log::debug!("Opened capture device '{}' at {} Hz", name, sample_rate);
                Ok(OpenDevice::new(device, claim, Arc::clone(&self.shared)))
            }
            Err(e) => {
                log::error!(
                    "Failed to open the audio capture device with the name '{}': {}",
                    name,
                    e
                );
                Err(e)
            }
        }
    }

    /// Start the hardware and hand the device to a new capture thread.
    fn launch(
        &mut self,
        mut device: OpenDevice<B::Device>,
        samples: SampleBuffer,
    ) -> Result<(), RecorderError> {
        if let Err(e) = device.start() {
            log::error!("Failed to start the audio capture device: {}", e);
            self.samples = Some(samples);
            return Err(e);
        }

        self.shared.set_running(true);
        self.shared.set_state(RecorderState::Capturing);

        let shared = Arc::clone(&self.shared);
        let handler = Arc::clone(&self.handler);
        let spawned = thread::Builder::new()
            .name(CAPTURE_THREAD_NAME.into())
            .spawn(move || polling::record(device, samples, shared, handler));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to spawn the capture thread: {}", e);
                self.shared.set_running(false);
                self.shared.set_state(RecorderState::Idle);
                Err(RecorderError::ThreadSpawnFailed(e.to_string()))
            }
        }
    }

    /// Wait for the capture thread to exit and take the sample buffer back.
    fn join_worker(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        match handle.join() {
            Ok(samples) => self.samples = Some(samples),
            Err(_) => {
                // The device was closed while unwinding.
                log::error!("Capture thread panicked");
                self.shared.set_state(RecorderState::Idle);
            }
        }
    }

    /// Join a capture thread that ended because its handler asked it to.
    fn reap_finished_session(&mut self) {
        if !self.shared.is_running() {
            self.join_worker();
        }
    }
}

impl<B: CaptureBackend, H: RecorderHandler> Drop for Recorder<B, H> {
    fn drop(&mut self) {
        if self.shared.is_running() {
            self.stop();
        } else {
            self.join_worker();
        }
    }
}
