/// Processing hooks driven by a `Recorder`.
///
/// `on_start` and `on_stop` run on the thread calling the recorder (or on the
/// capture thread when the handler itself ended the session).
/// `on_process_samples` always runs on the capture thread.
pub trait RecorderHandler: Send + 'static {
    /// Called once per session after the device is opened and before the
    /// hardware starts. Returning false aborts the start.
    fn on_start(&mut self) -> bool {
        true
    }

    /// Called with every non-empty batch of captured samples, plus once more
    /// for the samples left when capture ends. The slice is only valid for
    /// the duration of the call. Returning false ends the session.
    fn on_process_samples(&mut self, samples: &[i16]) -> bool;

    /// Called once the device is closed, on every path that ends a capture.
    fn on_stop(&mut self) {}
}

impl<F> RecorderHandler for F
where
    F: FnMut(&[i16]) -> bool + Send + 'static,
{
    fn on_process_samples(&mut self, samples: &[i16]) -> bool {
        self(samples)
    }
}
