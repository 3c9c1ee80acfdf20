use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::models::state::RecorderState;
use crate::session::device_slot::SlotClaim;
use crate::traits::capture_backend::CaptureDevice;

/// State shared between a recorder and its capture thread.
pub(crate) struct SessionShared {
    state: Mutex<RecorderState>,
    running: Mutex<bool>,
    wake: Condvar,
    device_open: AtomicBool,
    interval_micros: AtomicU64,
}

impl SessionShared {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            state: Mutex::new(RecorderState::Idle),
            running: Mutex::new(false),
            wake: Condvar::new(),
            device_open: AtomicBool::new(false),
            interval_micros: AtomicU64::new(to_micros(interval)),
        }
    }

    pub(crate) fn state(&self) -> RecorderState {
        *self.state.lock()
    }

    pub(crate) fn set_state(&self, state: RecorderState) {
        *self.state.lock() = state;
    }

    pub(crate) fn is_running(&self) -> bool {
        *self.running.lock()
    }

    /// Raise or clear the run flag, waking the capture thread if it sleeps.
    pub(crate) fn set_running(&self, running: bool) {
        *self.running.lock() = running;
        self.wake.notify_all();
    }

    /// Sleep for the processing interval, returning early once the run flag
    /// is cleared.
    pub(crate) fn wait_interval(&self) {
        let timeout = self.processing_interval();
        let mut running = self.running.lock();
        self.wake.wait_while_for(&mut running, |running| *running, timeout);
    }

    pub(crate) fn processing_interval(&self) -> Duration {
        Duration::from_micros(self.interval_micros.load(Ordering::Relaxed))
    }

    pub(crate) fn set_processing_interval(&self, interval: Duration) {
        self.interval_micros.store(to_micros(interval), Ordering::Relaxed);
    }

    pub(crate) fn is_device_open(&self) -> bool {
        self.device_open.load(Ordering::SeqCst)
    }

    fn set_device_open(&self, open: bool) {
        self.device_open.store(open, Ordering::SeqCst);
    }
}

fn to_micros(interval: Duration) -> u64 {
    u64::try_from(interval.as_micros()).unwrap_or(u64::MAX)
}

/// A capture device together with the slot claim that allowed opening it.
///
/// Dropping it closes the device first and frees the slot afterwards, so a
/// new device can never be opened while the old one is still live.
pub(crate) struct OpenDevice<D: CaptureDevice> {
    device: D,
    shared: Arc<SessionShared>,
    _claim: SlotClaim,
}

impl<D: CaptureDevice> OpenDevice<D> {
    pub(crate) fn new(device: D, claim: SlotClaim, shared: Arc<SessionShared>) -> Self {
        shared.set_device_open(true);
        Self {
            device,
            shared,
            _claim: claim,
        }
    }
}

impl<D: CaptureDevice> Deref for OpenDevice<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.device
    }
}

impl<D: CaptureDevice> DerefMut for OpenDevice<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

impl<D: CaptureDevice> Drop for OpenDevice<D> {
    fn drop(&mut self) {
        self.device.close();
        self.shared.set_device_open(false);
        log::debug!("Audio capture device closed");
    }
}
