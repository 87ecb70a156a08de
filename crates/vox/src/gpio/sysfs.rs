use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Direction, PinIo, Pull};

/// Linux sysfs GPIO (`/sys/class/gpio`).
///
/// Pins are exported on first configuration. The sysfs interface has no
/// control over bias resistors, so a requested pull is only logged and must
/// be provided by the board or device tree.
pub struct SysfsPins {
    root: PathBuf,
}

impl SysfsPins {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pin_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{}", pin))
    }

    fn export(&self, pin: u32) -> io::Result<()> {
        if self.pin_dir(pin).exists() {
            return Ok(());
        }
        debug!(pin, "Exporting GPIO");
        fs::write(self.root.join("export"), pin.to_string())
    }
}

impl PinIo for SysfsPins {
    fn configure_pin(&self, pin: u32, direction: Direction, pull: Pull) {
        if let Err(e) = self.export(pin) {
            warn!(pin, error = %e, "Failed to export GPIO");
        }

        let value = match direction {
            Direction::Input => "in",
            Direction::Output => "out",
        };
        if let Err(e) = fs::write(self.pin_dir(pin).join("direction"), value) {
            warn!(pin, error = %e, "Failed to set GPIO direction");
        }

        if pull != Pull::None {
            warn!(pin, ?pull, "sysfs GPIO cannot set bias, configure the pull externally");
        }
    }

    fn write_pin(&self, pin: u32, value: bool) {
        let value = if value { "1" } else { "0" };
        if let Err(e) = fs::write(self.pin_dir(pin).join("value"), value) {
            warn!(pin, error = %e, "Failed to write GPIO");
        }
    }

    fn read_pin(&self, pin: u32) -> bool {
        match fs::read_to_string(self.pin_dir(pin).join("value")) {
            Ok(s) => s.trim() == "1",
            Err(e) => {
                warn!(pin, error = %e, "Failed to read GPIO");
                false
            }
        }
    }

    fn name(&self) -> &str {
        "sysfs"
    }
}
