//! Slidecut - voiceover-timed photo slideshows
//!
//! Entry point for the `slidecut` command.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use slidecut_core::{FrameRate, TickClock};
use slidecut_media::{probe_duration, scan_folder, srt, ExportPreset, ExportQueue};
use slidecut_timeline::{
    allocate, assemble, place, LogLevel, Manifest, ManifestEntry, MediaItem, Placement,
    SlideSequence, SlideshowConfig, SlideshowRequest,
};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{AssembleArgs, Cli, Command, ExportArgs, PlanArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let level = match cli.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(cli.config.as_deref())?;
    let manifest_path = match cli.manifest {
        Some(path) => path,
        None => Manifest::default_path().context("No data directory for the manifest")?,
    };

    match cli.command {
        Command::Plan(args) => run_plan(&config, args),
        Command::Assemble(args) => run_assemble(&config, &manifest_path, args),
        Command::Export(args) => run_export(&manifest_path, args),
    }
}

fn load_config(path: Option<&Path>) -> Result<SlideshowConfig> {
    let config = match path {
        Some(path) => SlideshowConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match SlideshowConfig::default_path() {
            Some(path) => SlideshowConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SlideshowConfig::default(),
        },
    };
    Ok(config)
}

#[derive(Serialize)]
struct PlanOutput {
    frame_rate: FrameRate,
    total_frames: i64,
    base_frames: i64,
    safe_max_var_frames: i64,
    frames: Vec<i64>,
    placements: Vec<Placement>,
}

fn run_plan(config: &SlideshowConfig, args: PlanArgs) -> Result<()> {
    let rate = FrameRate::from_fps_f64(args.fps)?;
    let mut config = config.clone();
    if let Some(variation) = args.variation {
        config.max_variation_seconds = variation;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let mut rng = config.rng();
    let plan = allocate(
        args.duration,
        args.count,
        config.max_variation_seconds,
        rate,
        &mut rng,
    )?;
    let placement = place(&plan, TickClock::for_rate(rate, config.ticks_per_second), rate)?;

    let output = PlanOutput {
        frame_rate: rate,
        total_frames: plan.total_frames,
        base_frames: plan.base_frames,
        safe_max_var_frames: plan.safe_max_var_frames,
        placements: placement.placements().collect(),
        frames: plan.frames,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_assemble(config: &SlideshowConfig, manifest_path: &Path, args: AssembleArgs) -> Result<()> {
    let mut config = config.clone();
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let images = scan_folder(&args.folder, &config.image_extensions)
        .with_context(|| format!("Failed to scan {}", args.folder.display()))?;
    if images.is_empty() {
        bail!("No images found in {}", args.folder.display());
    }

    let voice_duration_seconds = match args.voice_duration {
        Some(seconds) => seconds,
        None => probe_duration(&args.voice)
            .with_context(|| format!("Failed to probe {}", args.voice.display()))?,
    };

    let captions = match &args.captions {
        Some(path) => Some(
            srt::parse_file(path)
                .with_context(|| format!("Failed to read captions {}", path.display()))?,
        ),
        None => None,
    };

    let name = match args.name {
        Some(name) => name,
        None => args
            .folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Slideshow".to_string()),
    };

    let mut sequence = match args.fps {
        Some(fps) => SlideSequence::new(&name, FrameRate::from_fps_f64(fps)?, config.ticks_per_second),
        None => SlideSequence::new(&name, config.fallback_frame_rate, config.ticks_per_second)
            .without_frame_rate(),
    };

    let request = SlideshowRequest {
        name: name.clone(),
        images,
        voice: MediaItem::new(args.voice.clone()),
        voice_duration_seconds,
        captions,
    };
    let mut rng = config.rng();
    let report = assemble(&request, &config, &mut sequence, &mut rng)?;

    for line in report.log.at_least(LogLevel::Warn) {
        eprintln!("warning: {}", line.message);
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", name)));
    sequence
        .save_to_file(&output)
        .with_context(|| format!("Failed to save sequence {}", output.display()))?;
    info!(path = %output.display(), "saved sequence");

    let mut manifest = Manifest::load_or_default(manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    manifest.record(ManifestEntry::from_report(
        &report,
        &args.folder,
        &args.voice,
        voice_duration_seconds,
        created_at,
    ));
    manifest
        .save_to_file(manifest_path)
        .with_context(|| format!("Failed to save manifest {}", manifest_path.display()))?;

    println!(
        "{}: {} images, {} frames at {} ({:.3} s), {} gaps closed -> {}",
        report.name,
        report.plan.len(),
        report.plan.total_frames,
        report.frame_rate,
        report.clock.ticks_to_seconds(sequence.duration_ticks()),
        report.gap_fix.gaps_closed(),
        output.display()
    );
    Ok(())
}

fn run_export(manifest_path: &Path, args: ExportArgs) -> Result<()> {
    let Some(preset) = ExportPreset::by_short_name(&args.preset) else {
        bail!("Unknown export preset '{}'", args.preset);
    };
    let manifest = Manifest::load_or_default(manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;

    for name in &args.sequences {
        if manifest.find(name).is_none() {
            warn!(sequence = %name, "not in manifest");
        }
    }

    let queue = ExportQueue::from_manifest(&manifest, &args.output_dir, &preset, &args.sequences);
    if queue.is_empty() {
        println!("Nothing to export");
        return Ok(());
    }
    for job in &queue.jobs {
        println!(
            "{}\t{}\t{}\t{}",
            job.sequence_name,
            job.duration(),
            job.preset.name,
            job.output_path.display()
        );
    }
    Ok(())
}
