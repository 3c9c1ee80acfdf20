//! cpal capture device.
//!
//! A cpal `Stream` is not `Send` on every platform, but the recorder moves
//! its device to the capture thread. The stream therefore lives on a
//! dedicated owner thread; this handle only keeps a command channel to it and
//! the sample queue its audio callback fills.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use parking_lot::Mutex;

use sound_recorder_core::{CaptureDevice, CaptureFormat, RecorderError, RingBuffer};

use crate::device_enumerator::{open_failed, select_input_config, DeviceEnumerator};

type Reply = mpsc::Sender<Result<(), String>>;

enum StreamCommand {
    Play(Reply),
    Pause(Reply),
    Close,
}

/// An open cpal input stream delivering 16-bit mono samples.
///
/// The sample queue holds one second of audio; if the recorder falls behind,
/// the oldest samples are dropped.
pub struct CpalCaptureDevice {
    device_name: String,
    queue: Arc<Mutex<RingBuffer>>,
    commands: mpsc::Sender<StreamCommand>,
    stream_thread: Option<JoinHandle<()>>,
}

impl CpalCaptureDevice {
    /// Build an input stream on `name` (empty for the default device).
    ///
    /// Blocks until the owner thread reports whether the stream could be
    /// built. The stream is created paused.
    pub fn open(name: &str, format: CaptureFormat) -> Result<Self, RecorderError> {
        let queue = Arc::new(Mutex::new(RingBuffer::new(format.sample_rate as usize)));
        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread_queue = Arc::clone(&queue);
        let thread_name = name.to_string();
        let stream_thread = thread::Builder::new()
            .name("sound-recorder-stream".into())
            .spawn(move || {
                run_stream_thread(&thread_name, format, thread_queue, command_rx, ready_tx)
            })
            .map_err(|e| open_failed(name, format!("failed to spawn stream thread: {}", e)))?;

        let device_name = match ready_rx.recv() {
            Ok(Ok(device_name)) => device_name,
            Ok(Err(e)) => {
                let _ = stream_thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = stream_thread.join();
                return Err(open_failed(name, "stream thread exited unexpectedly"));
            }
        };

        log::info!("Capture stream ready on '{}' at {} Hz", device_name, format.sample_rate);

        Ok(Self {
            device_name,
            queue,
            commands: command_tx,
            stream_thread: Some(stream_thread),
        })
    }

    /// Name of the device backing the stream.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    fn send(&self, command: fn(Reply) -> StreamCommand) -> Result<(), String> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.commands
            .send(command(reply_tx))
            .map_err(|_| "stream thread is gone".to_string())?;
        reply_rx
            .recv()
            .map_err(|_| "stream thread is gone".to_string())?
    }
}

impl CaptureDevice for CpalCaptureDevice {
    fn start(&mut self) -> Result<(), RecorderError> {
        self.send(StreamCommand::Play)
            .map_err(RecorderError::DeviceStartFailed)
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.send(StreamCommand::Pause)
            .map_err(RecorderError::DeviceStopFailed)
    }

    fn available_samples(&self) -> usize {
        self.queue.lock().count()
    }

    fn read_samples(&mut self, out: &mut [i16]) -> usize {
        self.queue.lock().read_into(out)
    }

    fn close(&mut self) {
        let Some(handle) = self.stream_thread.take() else {
            return;
        };

        let _ = self.commands.send(StreamCommand::Close);
        if handle.join().is_err() {
            log::error!("Capture stream thread for '{}' panicked", self.device_name);
        }

        let dropped = self.queue.lock().dropped();
        if dropped > 0 {
            log::warn!(
                "Capture queue on '{}' overflowed: {} samples dropped",
                self.device_name,
                dropped
            );
        }
        log::info!("Capture stream on '{}' closed", self.device_name);
    }
}

impl Drop for CpalCaptureDevice {
    fn drop(&mut self) {
        self.close();
    }
}

/// Owner thread: builds the stream, reports the outcome, then serves
/// play/pause commands until told to close.
fn run_stream_thread(
    name: &str,
    format: CaptureFormat,
    queue: Arc<Mutex<RingBuffer>>,
    commands: mpsc::Receiver<StreamCommand>,
    ready: mpsc::Sender<Result<String, RecorderError>>,
) {
    let (stream, device_name) = match build_stream(name, format, queue) {
        Ok(built) => built,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if ready.send(Ok(device_name)).is_err() {
        return;
    }

    while let Ok(command) = commands.recv() {
        match command {
            StreamCommand::Play(reply) => {
                let _ = reply.send(stream.play().map_err(|e| e.to_string()));
            }
            StreamCommand::Pause(reply) => {
                let _ = reply.send(stream.pause().map_err(|e| e.to_string()));
            }
            StreamCommand::Close => break,
        }
    }

    drop(stream);
}

fn build_stream(
    name: &str,
    format: CaptureFormat,
    queue: Arc<Mutex<RingBuffer>>,
) -> Result<(Stream, String), RecorderError> {
    let device = DeviceEnumerator::new()
        .find_capture_device(name)
        .ok_or_else(|| open_failed(name, "no such capture device"))?;
    let device_name = device.name().unwrap_or_else(|_| name.to_string());

    let supported =
        select_input_config(&device, format.sample_rate).map_err(|e| open_failed(name, e))?;
    let channels = supported.channels() as usize;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();

    log::debug!(
        "Building capture stream on '{}': {} Hz, {} channel(s), {:?}",
        device_name,
        config.sample_rate.0,
        channels,
        sample_format
    );

    let stream = match sample_format {
        SampleFormat::I16 => build_input::<i16>(&device, &config, channels, queue),
        SampleFormat::F32 => build_input::<f32>(&device, &config, channels, queue),
        SampleFormat::U16 => build_input::<u16>(&device, &config, channels, queue),
        other => return Err(open_failed(name, format!("unsupported sample format {:?}", other))),
    }
    .map_err(|e| open_failed(name, e))?;

    // Streams may start running as soon as they are built on some hosts.
    if let Err(e) = stream.pause() {
        log::debug!("Could not pause freshly built stream on '{}': {}", device_name, e);
    }

    Ok((stream, device_name))
}

/// Input stream that keeps the first channel of every frame, as i16.
fn build_input<T>(
    device: &Device,
    config: &StreamConfig,
    channels: usize,
    queue: Arc<Mutex<RingBuffer>>,
) -> Result<Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let channels = channels.max(1);
    let mut mono = Vec::new();

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            mono.clear();
            mono.extend(data.iter().step_by(channels).map(|&s| s.to_sample::<i16>()));
            queue.lock().write(&mono);
        },
        |err| log::error!("Audio capture stream error: {}", err),
        None,
    )
}
