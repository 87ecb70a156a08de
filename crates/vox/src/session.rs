use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::{UPDATE_PERIOD, VoxConfig};
use crate::error::VoxError;
use crate::filter::SessionHandle;
use crate::level::{SampleFormat, Samples, calc_dbov};
use crate::policy::decide;
use crate::ptt::{PttOutput, SquelchInput};
use crate::timer::RepeatingTimer;

/// Lifecycle of one VOX session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Attached, no level measured yet. Ticks do nothing.
    Uninitialized,
    /// At least one level measured; ticks drive PTT.
    Active,
    /// Detached. The timer is cancelled and the state is no longer touched.
    Terminated,
}

struct ControllerState {
    last_loudness_dbov: f64,
    started: bool,
    release_ticks: u32,
    phase: SessionPhase,
}

pub(crate) struct SessionShared {
    handle: SessionHandle,
    config: Arc<VoxConfig>,
    ptt: Arc<PttOutput>,
    squelch: Arc<SquelchInput>,
    state: Mutex<ControllerState>,
    timer: Mutex<Option<RepeatingTimer>>,
}

impl SessionShared {
    /// One decision period. The only place a session mutates PTT.
    pub(crate) fn tick(&self) {
        let mut state = self.state.lock();
        if state.phase == SessionPhase::Terminated || !state.started {
            return;
        }

        let squelch = self.squelch.asserted();
        let decision = decide(
            state.last_loudness_dbov,
            squelch,
            &self.config,
            state.release_ticks,
        );
        trace!(
            session = %self.handle,
            level = state.last_loudness_dbov,
            squelch,
            release_ticks = decision.release_ticks,
            ptt = decision.ptt,
            "VOX tick"
        );
        state.release_ticks = decision.release_ticks;
        self.ptt.set(decision.ptt);
    }

    /// Moves to `Terminated` and cancels the timer.
    ///
    /// Returns `false` if the session was already terminated. After this
    /// returns no tick of this session has any effect.
    pub(crate) fn terminate(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.phase == SessionPhase::Terminated {
                return false;
            }
            state.phase = SessionPhase::Terminated;
        }

        // The state lock is released first: an in-flight tick holds the
        // timer gate and may be waiting for it.
        let timer = self.timer.lock().take();
        if let Some(timer) = timer {
            timer.cancel();
        }

        info!(session = %self.handle, "VOX session terminated");
        true
    }
}

/// Per audio session VOX controller.
///
/// Created when a session attaches the VOX filter. Decoded frames update the
/// last measured level; a [`RepeatingTimer`] samples it every
/// [`UPDATE_PERIOD`] and runs the decision policy.
pub struct VoxSession {
    shared: Arc<SessionShared>,
    format: SampleFormat,
}

impl VoxSession {
    /// Creates the session state and arms its timer.
    ///
    /// Fails with [`VoxError::AllocationFailure`] if the timer cannot be
    /// armed, in which case nothing is left running.
    pub fn attach(
        handle: SessionHandle,
        format: SampleFormat,
        config: Arc<VoxConfig>,
        ptt: Arc<PttOutput>,
        squelch: Arc<SquelchInput>,
    ) -> Result<Self, VoxError> {
        let shared = Arc::new(SessionShared {
            handle,
            config,
            ptt,
            squelch,
            state: Mutex::new(ControllerState {
                last_loudness_dbov: 0.0,
                started: false,
                release_ticks: 0,
                phase: SessionPhase::Uninitialized,
            }),
            timer: Mutex::new(None),
        });

        let weak = Arc::downgrade(&shared);
        let timer = RepeatingTimer::start(UPDATE_PERIOD, move || {
            if let Some(shared) = weak.upgrade() {
                shared.tick();
            }
        })?;
        *shared.timer.lock() = Some(timer);

        info!(session = %handle, %format, "VOX session attached");

        Ok(Self { shared, format })
    }

    /// Measures a decoded frame and stores its level for the next tick.
    ///
    /// The first successful call moves the session to
    /// [`SessionPhase::Active`].
    pub fn decode(&self, samples: Samples<'_>) -> Result<(), VoxError> {
        if samples.is_empty() {
            warn!(session = %self.shared.handle, "Rejecting empty audio frame");
            return Err(VoxError::InvalidArgument("empty audio frame".into()));
        }
        if samples.format() != self.format {
            warn!(
                session = %self.shared.handle,
                expected = %self.format,
                got = %samples.format(),
                "Rejecting audio frame with wrong sample format"
            );
            return Err(VoxError::InvalidArgument(format!(
                "frame format {} does not match session format {}",
                samples.format(),
                self.format
            )));
        }

        let level = calc_dbov(samples);

        let mut state = self.shared.state.lock();
        match state.phase {
            SessionPhase::Terminated => {
                return Err(VoxError::InvalidArgument("session is terminated".into()));
            }
            SessionPhase::Uninitialized => {
                state.phase = SessionPhase::Active;
                debug!(session = %self.shared.handle, level, "First level measured, VOX active");
            }
            SessionPhase::Active => {}
        }
        state.last_loudness_dbov = level;
        state.started = true;

        Ok(())
    }

    /// Tears the session down. Idempotent; also runs on drop.
    pub fn close(&self) {
        self.shared.terminate();
    }

    pub fn handle(&self) -> SessionHandle {
        self.shared.handle
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.state.lock().phase
    }

    /// Last measured level, `None` before the first frame.
    pub fn last_loudness_dbov(&self) -> Option<f64> {
        let state = self.shared.state.lock();
        state.started.then_some(state.last_loudness_dbov)
    }

    pub fn release_ticks(&self) -> u32 {
        self.shared.state.lock().release_ticks
    }

    pub(crate) fn shared(&self) -> &Arc<SessionShared> {
        &self.shared
    }
}

impl Drop for VoxSession {
    fn drop(&mut self) {
        self.shared.terminate();
    }
}
