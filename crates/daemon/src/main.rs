use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncRead;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxptt_config::Settings;
use voxptt_daemon::{feed, frame_bytes, open_pins, vox_config};
use voxptt_vox::{DecodeChain, FilterParams, FilterRegistry, SampleFormat, SessionHandle, VoxModule};

/// Voice-operated PTT switch.
///
/// Reads raw interleaved PCM (e.g. `arecord -t raw -f S16_LE -r 8000 -c 1`)
/// and keys the transmitter while voice is present.
#[derive(Parser, Debug)]
#[command(name = "voxptt", version)]
struct Cli {
    /// Raw PCM input file, "-" for stdin.
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Extra config file, layered above config/default and config/local.
    #[arg(short, long)]
    config: Option<String>,

    /// Use in-memory pins whatever the configured backend.
    #[arg(long)]
    dry_run: bool,

    /// Feed frames at their real duration (for recorded files).
    #[arg(long)]
    realtime: bool,

    /// Log as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "voxptt_daemon=debug,voxptt_vox=debug,voxptt_config=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let settings = Settings::load_with(cli.config.as_deref())?;
    let format: SampleFormat = settings.audio.format.parse()?;
    let frame_bytes = frame_bytes(&settings.audio, format)?;
    info!(
        input = %cli.input,
        %format,
        sample_rate = settings.audio.sample_rate,
        channels = settings.audio.channels,
        frame_ms = settings.audio.frame_ms,
        "Starting voxptt"
    );

    let pins = open_pins(&settings.gpio, cli.dry_run);
    let registry = FilterRegistry::new();
    let module = VoxModule::init(vox_config(&settings.vox), pins, &registry)?;

    let mut chain = DecodeChain::new(FilterParams {
        session: SessionHandle::next(),
        sample_rate: settings.audio.sample_rate,
        channels: settings.audio.channels,
        format,
    });
    chain.update(&registry)?;

    let reader: Box<dyn AsyncRead + Unpin + Send> = if cli.input == "-" {
        Box::new(tokio::io::stdin())
    } else {
        Box::new(tokio::fs::File::open(&cli.input).await?)
    };
    let pace = cli
        .realtime
        .then(|| Duration::from_millis(u64::from(settings.audio.frame_ms)));

    tokio::select! {
        result = feed(reader, &mut chain, format, frame_bytes, pace) => {
            let frames = result?;
            info!(frames, "Input finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
        }
    }

    drop(chain);
    module.close();

    Ok(())
}
