use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::info;

use crate::config::VoxConfig;
use crate::error::VoxError;
use crate::filter::{AudioFilter, DecodeFilter, FilterParams, FilterRegistry};
use crate::gpio::PinIo;
use crate::level::Samples;
use crate::ptt::{PttOutput, SquelchInput};
use crate::session::{SessionShared, VoxSession};

pub const VOX_FILTER_NAME: &str = "vox";

/// The VOX decode filter. Every attached session shares one PTT line.
pub struct VoxFilter {
    config: Arc<VoxConfig>,
    ptt: Arc<PttOutput>,
    squelch: Arc<SquelchInput>,
    sessions: Mutex<Vec<Weak<SessionShared>>>,
}

impl VoxFilter {
    /// Number of sessions attached and not yet dropped.
    pub fn live_sessions(&self) -> usize {
        self.sessions
            .lock()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Terminates every live session. Returns how many were still running.
    fn terminate_all(&self) -> usize {
        let sessions: Vec<Arc<SessionShared>> = self
            .sessions
            .lock()
            .drain(..)
            .filter_map(|s| s.upgrade())
            .collect();
        sessions.iter().filter(|s| s.terminate()).count()
    }
}

impl AudioFilter for VoxFilter {
    fn name(&self) -> &str {
        VOX_FILTER_NAME
    }

    fn attach(&self, params: &FilterParams) -> Result<Box<dyn DecodeFilter>, VoxError> {
        let session = VoxSession::attach(
            params.session,
            params.format,
            self.config.clone(),
            self.ptt.clone(),
            self.squelch.clone(),
        )?;

        let mut sessions = self.sessions.lock();
        sessions.retain(|s| s.strong_count() > 0);
        sessions.push(Arc::downgrade(session.shared()));

        Ok(Box::new(session))
    }
}

impl DecodeFilter for VoxSession {
    fn decode(&mut self, samples: Samples<'_>) -> Result<(), VoxError> {
        VoxSession::decode(self, samples)
    }
}

/// VOX module lifecycle: configures the pins and registers the filter at
/// init, unregisters and forces PTT off at close.
pub struct VoxModule {
    config: Arc<VoxConfig>,
    filter: Arc<VoxFilter>,
    registry: FilterRegistry,
    ptt: Arc<PttOutput>,
    closed: bool,
}

impl VoxModule {
    pub fn init(
        config: VoxConfig,
        pins: Arc<dyn PinIo>,
        registry: &FilterRegistry,
    ) -> Result<Self, VoxError> {
        info!(
            threshold = config.threshold_dbov,
            holdtime_ms = config.hold_ms,
            gpio_ptt = ?config.ptt_pin,
            gpio_squelch = ?config.squelch_pin,
            pins = pins.name(),
            "Loading VOX module"
        );

        let config = Arc::new(config);
        let ptt = Arc::new(PttOutput::new(pins.clone(), config.ptt_pin));
        let squelch = Arc::new(SquelchInput::new(pins, config.squelch_pin));

        let filter = Arc::new(VoxFilter {
            config: config.clone(),
            ptt: ptt.clone(),
            squelch: squelch.clone(),
            sessions: Mutex::new(Vec::new()),
        });
        if !registry.register(filter.clone()) {
            return Err(VoxError::InvalidArgument(format!(
                "a '{}' filter is already registered",
                VOX_FILTER_NAME
            )));
        }

        ptt.configure();
        squelch.configure();

        Ok(Self {
            config,
            filter,
            registry: registry.clone(),
            ptt,
            closed: false,
        })
    }

    pub fn config(&self) -> &VoxConfig {
        &self.config
    }

    pub fn filter(&self) -> &Arc<VoxFilter> {
        &self.filter
    }

    /// Last PTT value driven by any session.
    pub fn ptt_state(&self) -> bool {
        self.ptt.is_on()
    }

    /// Unregisters the filter, stops every session and forces PTT off.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.registry.unregister(VOX_FILTER_NAME);
        let stopped = self.filter.terminate_all();
        self.ptt.force_off();

        info!(stopped_sessions = stopped, "VOX module closed");
    }
}

impl Drop for VoxModule {
    fn drop(&mut self) {
        self.shutdown();
    }
}
