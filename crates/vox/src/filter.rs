//! Host-side audio filter plumbing.
//!
//! A [`FilterRegistry`] holds the filters modules register at init. Each
//! audio session owns a [`DecodeChain`] that attaches the registered filters
//! and passes every decoded frame through them.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::VoxError;
use crate::level::{SampleFormat, Samples};

/// Opaque identifier of an audio session's filter registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

impl SessionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates a process-unique handle.
    pub fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded-audio parameters negotiated for a session.
#[derive(Debug, Clone)]
pub struct FilterParams {
    pub session: SessionHandle,
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
}

/// Per-session state of an attached filter.
pub trait DecodeFilter: Send {
    fn decode(&mut self, samples: Samples<'_>) -> Result<(), VoxError>;
}

/// A filter a module registers with the host pipeline.
pub trait AudioFilter: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Creates the filter's state for one session.
    fn attach(&self, params: &FilterParams) -> Result<Box<dyn DecodeFilter>, VoxError>;
}

/// Registered filters, in registration order.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: Arc<RwLock<Vec<Arc<dyn AudioFilter>>>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter. A second filter with the same name is ignored.
    pub fn register(&self, filter: Arc<dyn AudioFilter>) -> bool {
        let mut filters = self.filters.write();
        if filters.iter().any(|f| f.name() == filter.name()) {
            warn!(filter = filter.name(), "Audio filter already registered");
            return false;
        }
        info!(filter = filter.name(), "Audio filter registered");
        filters.push(filter);
        true
    }

    pub fn unregister(&self, name: &str) -> bool {
        let mut filters = self.filters.write();
        let before = filters.len();
        filters.retain(|f| f.name() != name);
        let removed = filters.len() != before;
        if removed {
            info!(filter = name, "Audio filter unregistered");
        }
        removed
    }

    pub fn names(&self) -> Vec<String> {
        self.filters.read().iter().map(|f| f.name().to_string()).collect()
    }

    fn snapshot(&self) -> Vec<Arc<dyn AudioFilter>> {
        self.filters.read().clone()
    }
}

/// The filters attached to one audio session.
///
/// Dropping the chain drops every filter state, which is the session
/// teardown for the filters.
pub struct DecodeChain {
    params: FilterParams,
    states: Vec<(String, Box<dyn DecodeFilter>)>,
}

impl DecodeChain {
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            states: Vec::new(),
        }
    }

    /// Attaches every registered filter that is not attached yet.
    ///
    /// Existing states are kept, so calling this again after a
    /// renegotiation does not reset them. Returns how many filters were
    /// newly attached; on error the failing filter is left out.
    pub fn update(&mut self, registry: &FilterRegistry) -> Result<usize, VoxError> {
        let mut attached = 0;
        for filter in registry.snapshot() {
            if self.states.iter().any(|(name, _)| name == filter.name()) {
                continue;
            }
            let state = filter.attach(&self.params)?;
            debug!(
                session = %self.params.session,
                filter = filter.name(),
                "Decode filter attached"
            );
            self.states.push((filter.name().to_string(), state));
            attached += 1;
        }
        Ok(attached)
    }

    /// Passes a decoded frame through every attached filter in order.
    pub fn decode(&mut self, samples: Samples<'_>) -> Result<(), VoxError> {
        for (_, state) in self.states.iter_mut() {
            state.decode(samples)?;
        }
        Ok(())
    }

    /// Drops one filter's state.
    pub fn detach(&mut self, name: &str) -> bool {
        let before = self.states.len();
        self.states.retain(|(n, _)| n != name);
        self.states.len() != before
    }

    pub fn attached(&self) -> Vec<&str> {
        self.states.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }
}
