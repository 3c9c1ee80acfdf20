/// Holds the batch of samples most recently pulled from the capture device.
///
/// Each refill replaces the previous contents; the allocation is kept and
/// reused from one poll (and one session) to the next.
#[derive(Debug, Default, Clone)]
pub struct SampleBuffer {
    samples: Vec<i16>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to `count` samples, let `read` fill them, and keep only what
    /// it reports as written.
    pub fn refill<F>(&mut self, count: usize, read: F) -> &[i16]
    where
        F: FnOnce(&mut [i16]) -> usize,
    {
        self.samples.resize(count, 0);
        let written = read(&mut self.samples).min(count);
        self.samples.truncate(written);
        &self.samples
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refill_replaces_previous_batch() {
        let mut buffer = SampleBuffer::new();
        let batch = buffer.refill(4, |out| {
            out.copy_from_slice(&[1, 2, 3, 4]);
            4
        });
        assert_eq!(batch, &[1, 2, 3, 4]);

        let batch = buffer.refill(2, |out| {
            out.copy_from_slice(&[9, 8]);
            2
        });
        assert_eq!(batch, &[9, 8]);
    }

    #[test]
    fn short_read_truncates() {
        let mut buffer = SampleBuffer::new();
        let batch = buffer.refill(5, |out| {
            out[0] = 42;
            1
        });
        assert_eq!(batch, &[42]);
    }

    #[test]
    fn overreported_read_is_clamped() {
        let mut buffer = SampleBuffer::new();
        let batch = buffer.refill(2, |_| 10);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut buffer = SampleBuffer::new();
        buffer.refill(3, |_| 3);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
