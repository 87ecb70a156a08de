use crate::config::VoxConfig;

/// Outcome of one decision tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Remaining hold countdown after this tick.
    pub release_ticks: u32,
    /// PTT value to drive for this tick.
    pub ptt: bool,
}

/// Runs the VOX policy for one tick.
///
/// Squelch wins over voice: an asserted squelch clears the countdown. Voice
/// above `-threshold` re-arms the full hold countdown. Otherwise the previous
/// countdown keeps decaying, so PTT stays on for the hold time after the last
/// loud tick even while the current level is low.
pub fn decide(loudness_dbov: f64, squelch: bool, config: &VoxConfig, release_ticks: u32) -> Decision {
    let mut release_ticks = if squelch {
        0
    } else if loudness_dbov > config.cutoff_dbov() {
        config.hold_ticks()
    } else {
        release_ticks
    };

    let ptt = release_ticks > 0;
    if ptt {
        release_ticks -= 1;
    }

    Decision { release_ticks, ptt }
}
