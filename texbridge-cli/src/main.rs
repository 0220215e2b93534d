//! # texbridge
//!
//! Probe media sources against a native engine library, or drive a headless
//! playback session and report what the texture bridge saw.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use texbridge_core::dynamic::DynamicEngine;
use texbridge_core::{
    probe, ExternalTextureDesc, FrameHandle, LogLevel, MediaType, PlayerState, SourceConfig,
    TextureFactory, VideoSource,
};

const TICK: Duration = Duration::from_micros(16_667);

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Probe,
    Play,
}

#[derive(Debug)]
struct Options {
    command: Command,
    uri: String,
    library: Option<PathBuf>,
    config: Option<PathBuf>,
    log_level: Option<LogLevel>,
    ticks: u64,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let command = match args.get(1).map(String::as_str) {
        Some("probe") => Command::Probe,
        Some("play") => Command::Play,
        Some("--help") | Some("-h") | None => {
            print_usage();
            std::process::exit(0);
        }
        Some(other) => return Err(anyhow!("Unknown command: {}", other)),
    };

    let mut uri: Option<String> = None;
    let mut library: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut log_level: Option<LogLevel> = None;
    let mut ticks: u64 = 300;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--lib" | "-l" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("Missing value for --lib"))?;
                library = Some(PathBuf::from(value));
                i += 2;
            }
            "--config" | "-c" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("Missing value for --config"))?;
                config = Some(PathBuf::from(value));
                i += 2;
            }
            "--log-level" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("Missing value for --log-level"))?;
                log_level = Some(value.parse::<LogLevel>().map_err(|e| anyhow!(e))?);
                i += 2;
            }
            "--ticks" | "-n" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("Missing value for --ticks"))?;
                ticks = value
                    .parse::<u64>()
                    .map_err(|e| anyhow!("Invalid tick count {}: {}", value, e))?;
                i += 2;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            value if uri.is_none() && !value.starts_with('-') => {
                uri = Some(value.to_string());
                i += 1;
            }
            other => {
                tracing::warn!("Ignoring unknown argument {}", other);
                i += 1;
            }
        }
    }

    let uri = uri.ok_or_else(|| anyhow!("Missing media URI"))?;
    Ok(Options {
        command,
        uri,
        library,
        config,
        log_level,
        ticks,
    })
}

fn print_usage() {
    println!(
        "Usage:\n  texbridge probe <uri> [--lib PATH]\n  texbridge play <uri> [--lib PATH] [--config FILE] [--log-level LEVEL] [--ticks N]\n\n\
         The engine library defaults to $TEXBRIDGE_ENGINE, then the executable directory,\n\
         then the platform library name."
    );
}

// ============================================================================
// Headless Textures
// ============================================================================

/// Texture factory with no GPU behind it: records sizes and counts binds.
#[derive(Debug, Default)]
struct HeadlessTextures {
    binds: u64,
}

#[derive(Debug)]
struct HeadlessTexture {
    width: u32,
    height: u32,
}

impl TextureFactory for HeadlessTextures {
    type Texture = HeadlessTexture;

    fn create_external(&mut self, desc: &ExternalTextureDesc, frame: FrameHandle) -> Option<HeadlessTexture> {
        self.binds += 1;
        tracing::debug!("Texture {}x{} created over {:?}", desc.width, desc.height, frame);
        Some(HeadlessTexture {
            width: desc.width,
            height: desc.height,
        })
    }

    fn update_external(&mut self, texture: &mut HeadlessTexture, frame: FrameHandle) {
        self.binds += 1;
        tracing::trace!("Texture {}x{} bound to {:?}", texture.width, texture.height, frame);
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Serialize)]
struct ProbeReport {
    uri: String,
    media_type: MediaType,
    engine: PathBuf,
    can_output_to_texture: bool,
}

#[derive(Serialize)]
struct PlayReport {
    uri: String,
    media_type: MediaType,
    engine: PathBuf,
    /// Player state at the end of the run, before release.
    state: PlayerState,
    duration_secs: f32,
    position_secs: f32,
    width: u32,
    height: u32,
    ticks: u64,
    frames_presented: u64,
    textures_created: u64,
    texture_binds: u64,
}

fn load_engine(library: Option<PathBuf>) -> Result<DynamicEngine> {
    let engine = match library {
        Some(path) => DynamicEngine::load(path)?,
        None => DynamicEngine::load_default()?,
    };
    Ok(engine)
}

fn run_probe(options: Options) -> Result<()> {
    let engine = load_engine(options.library)?;
    let report = ProbeReport {
        media_type: MediaType::infer(&options.uri),
        engine: engine.path().to_path_buf(),
        can_output_to_texture: probe::can_output_to_texture(&engine, &options.uri),
        uri: options.uri,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_play(options: Options) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => SourceConfig::from_file(path)?,
        None => SourceConfig::default(),
    };
    if let Some(level) = options.log_level {
        config.log_level = level;
    }

    let engine = load_engine(options.library.or_else(|| config.library.clone()))?;
    let engine_path = engine.path().to_path_buf();
    let media_type = MediaType::infer(&options.uri);
    let mut source = VideoSource::new(engine, HeadlessTextures::default(), config);

    source.init().into_result().context("Engine init failed")?;
    source
        .open(&options.uri, media_type)
        .into_result()
        .with_context(|| format!("Failed to open {}", options.uri))?;
    if !source.auto_play() {
        source.start()?.into_result().context("Failed to start playback")?;
    }

    tracing::info!("Headless playback starting: uri={}, ticks={}", options.uri, options.ticks);

    let mut frames_presented = 0;
    for _ in 0..options.ticks {
        let tick_start = Instant::now();
        if source.current_frame_texture().is_some() {
            frames_presented += 1;
        }
        if let Some(rest) = TICK.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let report = PlayReport {
        uri: options.uri.clone(),
        media_type,
        engine: engine_path,
        state: source.state(),
        duration_secs: source.duration(),
        position_secs: source.position(),
        width: source.width(),
        height: source.height(),
        ticks: options.ticks,
        frames_presented,
        textures_created: source.textures().allocations(),
        texture_binds: source.textures().factory().binds,
    };
    source.release();

    tracing::info!(
        "Headless playback complete: frames_presented={}, textures_created={}",
        report.frames_presented,
        report.textures_created
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("texbridge=info,texbridge_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    match options.command {
        Command::Probe => run_probe(options),
        Command::Play => run_play(options),
    }
}
