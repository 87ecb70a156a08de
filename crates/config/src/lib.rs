pub mod settings;

pub use settings::{AudioSettings, GpioBackend, GpioSettings, Settings, VoxSettings};
