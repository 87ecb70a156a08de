/// A square wave whose level is `dbov`. Its RMS equals its amplitude, so the
/// measured level matches to within rounding.
pub fn tone_s16(dbov: f64, samples: usize) -> Vec<i16> {
    let amplitude = (32767.0 * 10f64.powf(dbov / 20.0)).round() as i16;
    (0..samples)
        .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
        .collect()
}

pub fn tone_f32(dbov: f64, samples: usize) -> Vec<f32> {
    let amplitude = 10f64.powf(dbov / 20.0) as f32;
    (0..samples)
        .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
        .collect()
}

/// Little-endian bytes of `frames` consecutive S16 frames at `dbov`.
pub fn pcm_bytes(dbov: f64, frames: usize, samples_per_frame: usize) -> Vec<u8> {
    tone_s16(dbov, frames * samples_per_frame)
        .into_iter()
        .flat_map(i16::to_le_bytes)
        .collect()
}
