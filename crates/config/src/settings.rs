use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::debug;

/// Voice level threshold in -dBov used when `vox_threshold` is absent.
pub const DEFAULT_VOX_THRESHOLD: u32 = 60;
/// PTT hold time in milliseconds used when `vox_holdtime` is absent.
pub const DEFAULT_VOX_HOLDTIME_MS: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub vox: VoxSettings,
    pub gpio: GpioSettings,
    pub audio: AudioSettings,
}

/// The four top-level `vox_*` keys.
///
/// These never fail to load: an absent or malformed value silently falls back
/// to the compiled-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxSettings {
    /// Positive dBov magnitude; voice is present above `-threshold`.
    pub threshold: u32,
    pub holdtime_ms: u32,
    pub gpio_ptt: Option<u32>,
    pub gpio_squelch: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GpioBackend {
    /// In-process pins, nothing touches hardware.
    Memory,
    /// Linux `/sys/class/gpio`.
    Sysfs,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GpioSettings {
    pub backend: GpioBackend,
    pub sysfs_root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioSettings {
    /// "s16le" or "float".
    pub format: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_ms: u32,
}

impl Default for VoxSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VOX_THRESHOLD,
            holdtime_ms: DEFAULT_VOX_HOLDTIME_MS,
            gpio_ptt: None,
            gpio_squelch: None,
        }
    }
}

impl VoxSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: lenient_u32(config, "vox_threshold").unwrap_or(DEFAULT_VOX_THRESHOLD),
            holdtime_ms: lenient_u32(config, "vox_holdtime").unwrap_or(DEFAULT_VOX_HOLDTIME_MS),
            gpio_ptt: lenient_u32(config, "vox_gpio_ptt"),
            gpio_squelch: lenient_u32(config, "vox_gpio_squelch"),
        }
    }
}

/// Reads an unsigned key, treating absent and malformed values alike.
fn lenient_u32(config: &Config, key: &str) -> Option<u32> {
    match config.get::<u32>(key) {
        Ok(value) => Some(value),
        Err(ConfigError::NotFound(_)) => None,
        Err(e) => {
            debug!(key, error = %e, "Ignoring malformed config value, using default");
            None
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Like [`Settings::load`], with one extra required file layered above
    /// `config/local` and below the environment.
    pub fn load_with(extra_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));
        if let Some(path) = extra_file {
            builder = builder.add_source(File::with_name(path));
        }
        let builder = builder.add_source(
            Environment::default()
                .separator("__")
                .prefix("VOXPTT"),
        );

        let config = Self::with_defaults(builder)?.build()?;
        Self::from_config(&config)
    }

    /// Installs the defaults for the strictly-typed sections.
    pub fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("gpio.backend", "memory")?
            .set_default("gpio.sysfs_root", "/sys/class/gpio")?
            .set_default("audio.format", "s16le")?
            .set_default("audio.sample_rate", 8000)?
            .set_default("audio.channels", 1)?
            .set_default("audio.frame_ms", 20)
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            vox: VoxSettings::from_config(config),
            gpio: config.get("gpio")?,
            audio: config.get("audio")?,
        })
    }
}
