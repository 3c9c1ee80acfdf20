pub mod device_slot;
mod polling;
pub mod recorder;
mod shared;
