use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::PathBuf;

use sound_recorder_core::RecorderHandler;

use crate::wav_format;

/// Recorder handler that streams captured samples into a WAV file.
///
/// The file is created in `on_start` and its header patched with the final
/// sizes in `on_stop`. Capture ends on its own once `max_samples` have been
/// written, or when writing fails.
pub struct WavRecorder {
    path: PathBuf,
    sample_rate: u32,
    max_samples: Option<usize>,
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl WavRecorder {
    pub fn new(path: impl Into<PathBuf>, sample_rate: u32, max_samples: Option<usize>) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            max_samples,
            writer: None,
            written: 0,
        }
    }

    /// Samples written during the last session.
    pub fn written(&self) -> usize {
        self.written
    }

    fn create(&self) -> io::Result<BufWriter<File>> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        writer.write_all(&wav_format::mono16_header(self.sample_rate, 0))?;
        Ok(writer)
    }

    fn finalize(&self, mut writer: BufWriter<File>) -> io::Result<()> {
        let data_size = u32::try_from(self.written * 2).unwrap_or(u32::MAX);
        writer.seek(SeekFrom::Start(0))?;
        writer.write_all(&wav_format::mono16_header(self.sample_rate, data_size))?;
        writer.flush()
    }
}

impl RecorderHandler for WavRecorder {
    fn on_start(&mut self) -> bool {
        match self.create() {
            Ok(writer) => {
                self.writer = Some(writer);
                self.written = 0;
                true
            }
            Err(e) => {
                log::error!("Failed to create {}: {}", self.path.display(), e);
                false
            }
        }
    }

    fn on_process_samples(&mut self, samples: &[i16]) -> bool {
        let Some(writer) = self.writer.as_mut() else {
            return false;
        };

        let remaining = self
            .max_samples
            .map_or(samples.len(), |max| max.saturating_sub(self.written));
        let samples = &samples[..samples.len().min(remaining)];

        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        if let Err(e) = writer.write_all(&bytes) {
            log::error!("Failed to write audio data: {}", e);
            return false;
        }
        self.written += samples.len();

        self.max_samples.map_or(true, |max| self.written < max)
    }

    fn on_stop(&mut self) {
        let Some(writer) = self.writer.take() else {
            return;
        };

        match self.finalize(writer) {
            Ok(()) => log::info!(
                "Wrote {} samples ({:.2}s) to {}",
                self.written,
                self.written as f64 / self.sample_rate as f64,
                self.path.display()
            ),
            Err(e) => log::error!("Failed to finalize {}: {}", self.path.display(), e),
        }
    }
}
