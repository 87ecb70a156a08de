//! Pin access layer.
//!
//! Pin operations are fire-and-forget: a backend that cannot reach its pin
//! logs the failure and carries on. Reads that fail report `false`.

pub mod memory;
pub mod sysfs;

pub use memory::MemoryPins;
pub use sysfs::SysfsPins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Digital pin access used for the PTT output and the squelch input.
pub trait PinIo: Send + Sync + 'static {
    fn configure_pin(&self, pin: u32, direction: Direction, pull: Pull);

    fn write_pin(&self, pin: u32, value: bool);

    fn read_pin(&self, pin: u32) -> bool;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
