use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

use super::{Direction, PinIo, Pull};

#[derive(Default)]
struct Inner {
    modes: HashMap<u32, (Direction, Pull)>,
    levels: HashMap<u32, bool>,
    writes: Vec<(u32, bool)>,
}

/// In-process pins.
///
/// Records every write in order and lets the caller drive input levels, so
/// it doubles as the dry-run backend of the daemon.
#[derive(Default)]
pub struct MemoryPins {
    inner: Mutex<Inner>,
}

impl MemoryPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives the level seen by `read_pin`.
    pub fn set_input(&self, pin: u32, value: bool) {
        self.inner.lock().levels.insert(pin, value);
    }

    /// Every `write_pin` call so far, oldest first.
    pub fn writes(&self) -> Vec<(u32, bool)> {
        self.inner.lock().writes.clone()
    }

    /// Values written to one pin, oldest first.
    pub fn writes_to(&self, pin: u32) -> Vec<bool> {
        self.inner
            .lock()
            .writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_writes(&self) {
        self.inner.lock().writes.clear();
    }

    /// Current level of a pin, if it was ever written or driven.
    pub fn level(&self, pin: u32) -> Option<bool> {
        self.inner.lock().levels.get(&pin).copied()
    }

    pub fn mode(&self, pin: u32) -> Option<(Direction, Pull)> {
        self.inner.lock().modes.get(&pin).copied()
    }
}

impl PinIo for MemoryPins {
    fn configure_pin(&self, pin: u32, direction: Direction, pull: Pull) {
        trace!(pin, ?direction, ?pull, "Configure pin");
        self.inner.lock().modes.insert(pin, (direction, pull));
    }

    fn write_pin(&self, pin: u32, value: bool) {
        trace!(pin, value, "Write pin");
        let mut inner = self.inner.lock();
        inner.levels.insert(pin, value);
        inner.writes.push((pin, value));
    }

    fn read_pin(&self, pin: u32) -> bool {
        let inner = self.inner.lock();
        match inner.levels.get(&pin) {
            Some(value) => *value,
            None => matches!(inner.modes.get(&pin), Some((_, Pull::Up))),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
