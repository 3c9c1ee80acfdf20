pub mod ring_buffer;
pub mod sample_buffer;
