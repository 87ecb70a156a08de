use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{info, warn};
use voxptt_config::{AudioSettings, GpioBackend, GpioSettings, VoxSettings};
use voxptt_vox::{DecodeChain, MemoryPins, OwnedSamples, PinIo, SampleFormat, SysfsPins, VoxConfig};

pub fn vox_config(settings: &VoxSettings) -> VoxConfig {
    VoxConfig {
        threshold_dbov: settings.threshold,
        hold_ms: settings.holdtime_ms,
        ptt_pin: settings.gpio_ptt,
        squelch_pin: settings.gpio_squelch,
    }
}

/// Opens the configured pin backend. `dry_run` always selects memory pins.
pub fn open_pins(settings: &GpioSettings, dry_run: bool) -> Arc<dyn PinIo> {
    match (settings.backend, dry_run) {
        (GpioBackend::Sysfs, false) => {
            info!(root = %settings.sysfs_root, "Using sysfs GPIO");
            Arc::new(SysfsPins::new(&settings.sysfs_root))
        }
        _ => {
            info!("Using in-memory GPIO, the radio will not be keyed");
            Arc::new(MemoryPins::new())
        }
    }
}

/// Size in bytes of one input frame.
pub fn frame_bytes(audio: &AudioSettings, format: SampleFormat) -> anyhow::Result<usize> {
    let samples = audio.sample_rate as usize * audio.frame_ms as usize / 1000;
    let bytes = samples * audio.channels as usize * format.bytes_per_sample();
    if bytes == 0 {
        anyhow::bail!(
            "audio frame is empty (sample_rate={}, frame_ms={}, channels={})",
            audio.sample_rate,
            audio.frame_ms,
            audio.channels
        );
    }
    Ok(bytes)
}

/// Reads fixed-size frames until EOF and passes them through the chain.
///
/// A trailing partial frame is discarded. Frames the filters reject are
/// logged and skipped. With `pace` set, one frame is fed per `pace` period.
/// Returns the number of frames fed.
pub async fn feed<R>(
    mut reader: R,
    chain: &mut DecodeChain,
    format: SampleFormat,
    frame_bytes: usize,
    pace: Option<Duration>,
) -> anyhow::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; frame_bytes];
    let mut pacer = pace.map(tokio::time::interval);
    let mut frames: u64 = 0;

    loop {
        match reader.read_exact(&mut buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }

        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }

        let samples = OwnedSamples::from_le_bytes(format, &buf);
        if let Err(e) = chain.decode(samples.as_samples()) {
            warn!(error = %e, "Audio frame rejected");
            continue;
        }

        frames += 1;
        if frames == 1 || frames % 500 == 0 {
            info!(frames, "Audio frames processed");
        }
    }

    Ok(frames)
}
