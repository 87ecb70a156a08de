pub mod config;
pub mod error;
pub mod filter;
pub mod gpio;
pub mod level;
pub mod module;
pub mod policy;
pub mod ptt;
pub mod session;
pub mod timer;

pub use config::{UPDATE_PERIOD, UPDATE_PERIOD_MS, VoxConfig};
pub use error::VoxError;
pub use filter::{
    AudioFilter, DecodeChain, DecodeFilter, FilterParams, FilterRegistry, SessionHandle,
};
pub use gpio::{Direction, MemoryPins, PinIo, Pull, SysfsPins};
pub use level::{LEVEL_MAX, LEVEL_MIN, OwnedSamples, SampleFormat, Samples, calc_dbov};
pub use module::{VOX_FILTER_NAME, VoxFilter, VoxModule};
pub use policy::{Decision, decide};
pub use ptt::{PttOutput, SquelchInput};
pub use session::{SessionPhase, VoxSession};
pub use timer::RepeatingTimer;
