use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VoxError;

/// Floor of the dBov scale; silence and empty frames report this.
pub const LEVEL_MIN: f64 = -96.0;
/// Full scale.
pub const LEVEL_MAX: f64 = 0.0;

const PEAK_S16: f64 = 32767.0;
const PEAK_FLOAT: f64 = 1.0;

/// Sample format of decoded audio handed to the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Signed 16-bit, little endian.
    S16le,
    /// 32-bit float, normalized to [-1.0, 1.0].
    Float,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::S16le => 2,
            SampleFormat::Float => 4,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFormat::S16le => f.write_str("s16le"),
            SampleFormat::Float => f.write_str("float"),
        }
    }
}

impl FromStr for SampleFormat {
    type Err = VoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s16le" | "s16" => Ok(SampleFormat::S16le),
            "float" | "f32" | "f32le" => Ok(SampleFormat::Float),
            other => Err(VoxError::InvalidArgument(format!(
                "unsupported sample format '{}'",
                other
            ))),
        }
    }
}

/// A borrowed frame of decoded audio.
#[derive(Debug, Clone, Copy)]
pub enum Samples<'a> {
    S16(&'a [i16]),
    Float(&'a [f32]),
}

impl Samples<'_> {
    pub fn format(&self) -> SampleFormat {
        match self {
            Samples::S16(_) => SampleFormat::S16le,
            Samples::Float(_) => SampleFormat::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::S16(s) => s.len(),
            Samples::Float(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An owned frame, used where audio arrives as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedSamples {
    S16(Vec<i16>),
    Float(Vec<f32>),
}

impl OwnedSamples {
    /// Decodes little-endian bytes. A trailing partial sample is dropped.
    pub fn from_le_bytes(format: SampleFormat, bytes: &[u8]) -> Self {
        match format {
            SampleFormat::S16le => OwnedSamples::S16(
                bytes
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect(),
            ),
            SampleFormat::Float => OwnedSamples::Float(
                bytes
                    .chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect(),
            ),
        }
    }

    pub fn as_samples(&self) -> Samples<'_> {
        match self {
            OwnedSamples::S16(s) => Samples::S16(s),
            OwnedSamples::Float(s) => Samples::Float(s),
        }
    }
}

fn rms(samples: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = samples.map(|s| s * s).sum();
    (sum / n as f64).sqrt()
}

/// Computes the loudness of a frame in dBov, clamped to
/// [`LEVEL_MIN`, `LEVEL_MAX`].
pub fn calc_dbov(samples: Samples<'_>) -> f64 {
    if samples.is_empty() {
        return LEVEL_MIN;
    }

    let rms = match samples {
        Samples::S16(s) => rms(s.iter().map(|&x| f64::from(x))) / PEAK_S16,
        Samples::Float(s) => rms(s.iter().map(|&x| f64::from(x))) / PEAK_FLOAT,
    };

    let dbov = 20.0 * rms.log10();
    if dbov.is_nan() {
        return LEVEL_MIN;
    }
    dbov.clamp(LEVEL_MIN, LEVEL_MAX)
}
