//! Records the selected input device into a WAV file.
//!
//! Usage: `sound-recorder-demo [seconds] [output.wav] [device name]`

mod wav_format;
mod wav_recorder;

use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use sound_recorder_cpal::{CpalBackend, CpalRecorder};
use sound_recorder_core::{RecorderConfig, RecorderError};

use wav_recorder::WavRecorder;

const SAMPLE_RATE: u32 = 44_100;
const DEFAULT_SECONDS: f64 = 5.0;
const MAX_SECONDS: f64 = 24.0 * 60.0 * 60.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seconds = parse_seconds(args.next().as_deref())?;
    let output = args.next().unwrap_or_else(|| "recording.wav".into());
    let device = args.next();

    let max_samples = (seconds * SAMPLE_RATE as f64) as usize;
    let handler = WavRecorder::new(&output, SAMPLE_RATE, Some(max_samples));
    let config = RecorderConfig {
        device,
        ..Default::default()
    };
    let mut recorder = CpalRecorder::with_config(CpalBackend, handler, config)?;

    if !recorder.is_available() {
        return Err(RecorderError::Unavailable.into());
    }

    println!("Capture devices:");
    let default = recorder.default_device();
    for name in recorder.available_devices() {
        let marker = if name == default { " (default)" } else { "" };
        println!("  - {}{}", name, marker);
    }

    println!("Recording {:.1}s from '{}' into {}", seconds, recorder.device(), output);
    recorder.start(SAMPLE_RATE)?;

    // The handler ends the session once it has enough samples.
    let deadline = Instant::now() + Duration::from_secs_f64(seconds + 2.0);
    while recorder.is_capturing() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }
    if recorder.is_capturing() {
        recorder.stop();
    }

    println!("Done: {} samples written", recorder.handler().written());
    Ok(())
}

/// Recording length from the first argument, in seconds.
fn parse_seconds(arg: Option<&str>) -> Result<f64, Box<dyn Error>> {
    let Some(arg) = arg else {
        return Ok(DEFAULT_SECONDS);
    };

    let seconds: f64 = arg.parse()?;
    if !(seconds > 0.0 && seconds <= MAX_SECONDS) {
        let message = format!(
            "recording length must be in (0, {}] seconds, got {}",
            MAX_SECONDS, arg
        );
        return Err(message.into());
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_defaults_when_missing() {
        assert_eq!(parse_seconds(None).unwrap(), DEFAULT_SECONDS);
        assert_eq!(parse_seconds(Some("2.5")).unwrap(), 2.5);
    }

    #[test]
    fn parse_seconds_rejects_out_of_range_values() {
        for arg in ["-1", "0", "NaN", "inf", "1e30", "abc"] {
            assert!(parse_seconds(Some(arg)).is_err(), "{} should be rejected", arg);
        }
    }
}
