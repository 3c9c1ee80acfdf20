use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::state::RecorderState;
use crate::processing::sample_buffer::SampleBuffer;
use crate::session::shared::{OpenDevice, SessionShared};
use crate::traits::capture_backend::CaptureDevice;
use crate::traits::recorder_handler::RecorderHandler;

/// Body of the capture thread for one session.
///
/// Polls the device every processing interval and hands each batch to the
/// handler until the run flag is cleared, either by the recorder or because
/// the handler returned false. Then stops the hardware, flushes what is left,
/// and closes the device before returning the sample buffer to the recorder.
pub(crate) fn record<D, H>(
    device: OpenDevice<D>,
    mut samples: SampleBuffer,
    shared: Arc<SessionShared>,
    handler: Arc<Mutex<H>>,
) -> SampleBuffer
where
    D: CaptureDevice,
    H: RecorderHandler,
{
    log::debug!("Capture thread started");
    // Declared before the device so that, when unwinding, the device is closed first.
    let exit = SessionExit(&*shared);
    let mut device = device;
    let mut stopped_by_handler = false;

    while shared.is_running() {
        if !process_captured_samples(&mut *device, &mut samples, &*handler) {
            log::info!("Recorder handler requested the end of the capture");
            shared.set_running(false);
            stopped_by_handler = true;
            break;
        }

        shared.wait_interval();
    }

    cleanup(device, &mut samples, &*handler);
    drop(exit);

    if stopped_by_handler {
        handler.lock().on_stop();
    }

    log::debug!("Capture thread finished");
    samples
}

/// Marks the session as over when the capture thread exits, including when
/// the handler panics.
struct SessionExit<'a>(&'a SessionShared);

impl Drop for SessionExit<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            log::error!("Capture thread is unwinding, ending the session");
        }
        self.0.set_running(false);
        self.0.set_state(RecorderState::Idle);
    }
}

/// Pull whatever the device has queued and forward it to the handler.
///
/// Returns the handler's verdict, or true when there was nothing to deliver.
fn process_captured_samples<D, H>(
    device: &mut D,
    samples: &mut SampleBuffer,
    handler: &Mutex<H>,
) -> bool
where
    D: CaptureDevice,
    H: RecorderHandler,
{
    let available = device.available_samples();
    if available == 0 {
        return true;
    }

    let batch = samples.refill(available, |out| device.read_samples(out));
    if batch.is_empty() {
        return true;
    }

    handler.lock().on_process_samples(batch)
}

fn cleanup<D, H>(mut device: OpenDevice<D>, samples: &mut SampleBuffer, handler: &Mutex<H>)
where
    D: CaptureDevice,
    H: RecorderHandler,
{
    if let Err(e) = device.stop() {
        log::warn!("Failed to stop the audio capture device: {}", e);
    }

    // Samples captured between the last poll and the hardware stop.
    process_captured_samples(&mut *device, samples, handler);

    drop(device);
}
