/// Fixed-capacity FIFO of captured samples.
///
/// Sits between a device's audio callback and the recorder's polling loop.
/// Wrap in `Arc<parking_lot::Mutex<RingBuffer>>` for cross-thread access.
///
/// Overflow behavior: drops oldest samples and counts them.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<i16>,
    write_index: usize,
    read_index: usize,
    available: usize,
    capacity: usize,
    dropped: u64,
}

impl RingBuffer {
    /// A zero capacity is bumped to one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0; capacity],
            write_index: 0,
            read_index: 0,
            available: 0,
            capacity,
            dropped: 0,
        }
    }

    /// Append samples, dropping the oldest ones on overflow.
    ///
    /// Returns how many samples were lost to make room.
    pub fn write(&mut self, samples: &[i16]) -> usize {
        if samples.is_empty() {
            return 0;
        }

        let mut lost = 0;
        let samples = if samples.len() > self.capacity {
            lost = samples.len() - self.capacity;
            &samples[lost..]
        } else {
            samples
        };

        let overflow = (self.available + samples.len()).saturating_sub(self.capacity);
        if overflow > 0 {
            self.read_index = (self.read_index + overflow) % self.capacity;
            self.available -= overflow;
            lost += overflow;
        }

        for &sample in samples {
            self.buffer[self.write_index] = sample;
            self.write_index = (self.write_index + 1) % self.capacity;
        }
        self.available += samples.len();
        self.dropped += lost as u64;
        lost
    }

    /// Move up to `out.len()` samples into `out`. Returns the number moved.
    pub fn read_into(&mut self, out: &mut [i16]) -> usize {
        let to_read = out.len().min(self.available);
        for (i, slot) in out.iter_mut().take(to_read).enumerate() {
            *slot = self.buffer[(self.read_index + i) % self.capacity];
        }
        self.read_index = (self.read_index + to_read) % self.capacity;
        self.available -= to_read;
        to_read
    }

    /// Read and remove up to `count` samples.
    pub fn read(&mut self, count: usize) -> Vec<i16> {
        let mut result = vec![0; count.min(self.available)];
        self.read_into(&mut result);
        result
    }

    pub fn count(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total samples lost to overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
