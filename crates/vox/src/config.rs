use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Decision cadence of the VOX timer, in milliseconds.
pub const UPDATE_PERIOD_MS: u32 = 100;
pub const UPDATE_PERIOD: Duration = Duration::from_millis(UPDATE_PERIOD_MS as u64);

/// Immutable VOX configuration, created once at module start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxConfig {
    /// Positive magnitude in dBov. Voice is present when the measured level
    /// is above `-threshold_dbov`.
    pub threshold_dbov: u32,
    /// Minimum time PTT stays on after the last detected voice activity.
    pub hold_ms: u32,
    /// PTT output pin. `None` = no PTT output.
    pub ptt_pin: Option<u32>,
    /// Squelch input pin. `None` = squelch disabled.
    pub squelch_pin: Option<u32>,
}

impl Default for VoxConfig {
    fn default() -> Self {
        Self {
            threshold_dbov: 60,
            hold_ms: 1000,
            ptt_pin: None,
            squelch_pin: None,
        }
    }
}

impl VoxConfig {
    /// Level above which a frame counts as voice activity.
    pub fn cutoff_dbov(&self) -> f64 {
        -f64::from(self.threshold_dbov)
    }

    /// Number of timer periods PTT is held after voice activity.
    pub fn hold_ticks(&self) -> u32 {
        self.hold_ms / UPDATE_PERIOD_MS
    }
}
