use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::gpio::{Direction, PinIo, Pull};

/// The PTT line, shared by every session of a module.
///
/// The cached value and the pin write sit under one lock, so writes from
/// concurrent sessions are serialized and a value is only written when it
/// changes.
pub struct PttOutput {
    pins: Arc<dyn PinIo>,
    pin: Option<u32>,
    current: Mutex<bool>,
}

impl PttOutput {
    pub fn new(pins: Arc<dyn PinIo>, pin: Option<u32>) -> Self {
        Self {
            pins,
            pin,
            current: Mutex::new(false),
        }
    }

    /// Configures the pin as an output. No-op without a pin.
    pub fn configure(&self) {
        if let Some(pin) = self.pin {
            self.pins.configure_pin(pin, Direction::Output, Pull::None);
        }
    }

    /// Drives PTT, writing the pin only when the value changes.
    pub fn set(&self, value: bool) {
        let mut current = self.current.lock();
        if *current == value {
            return;
        }
        if let Some(pin) = self.pin {
            self.pins.write_pin(pin, value);
        }
        debug!(ptt = value, "PTT changed");
        *current = value;
    }

    /// Writes PTT low regardless of the cached value.
    pub fn force_off(&self) {
        let mut current = self.current.lock();
        if let Some(pin) = self.pin {
            self.pins.write_pin(pin, false);
        }
        if *current {
            info!("PTT forced off");
        }
        *current = false;
    }

    pub fn is_on(&self) -> bool {
        *self.current.lock()
    }

    pub fn pin(&self) -> Option<u32> {
        self.pin
    }
}

/// The squelch input. Without a pin squelch never asserts.
pub struct SquelchInput {
    pins: Arc<dyn PinIo>,
    pin: Option<u32>,
}

impl SquelchInput {
    pub fn new(pins: Arc<dyn PinIo>, pin: Option<u32>) -> Self {
        Self { pins, pin }
    }

    /// Configures the pin as an input with pull-down, so a floating line
    /// reads as not asserted.
    pub fn configure(&self) {
        if let Some(pin) = self.pin {
            self.pins.configure_pin(pin, Direction::Input, Pull::Down);
        }
    }

    pub fn asserted(&self) -> bool {
        match self.pin {
            Some(pin) => self.pins.read_pin(pin),
            None => false,
        }
    }

    pub fn pin(&self) -> Option<u32> {
        self.pin
    }
}
