use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build voiceover-timed photo slideshows
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Manifest of created slideshows (defaults to the platform data directory)
    #[arg(short = 'm', long = "manifest", value_name = "FILE", global = true)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the per-image durations and timeline positions as JSON
    Plan(PlanArgs),
    /// Build a slideshow from an image folder and a voiceover
    Assemble(AssembleArgs),
    /// List export jobs for the slideshows in the manifest
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Voiceover length in seconds
    #[arg(short = 'd', long = "duration", value_name = "SECONDS")]
    pub duration: f64,

    /// Number of images
    #[arg(short = 'n', long = "count", value_name = "N")]
    pub count: usize,

    /// Sequence frame rate (e.g. 25, 29.97)
    #[arg(long = "fps", value_name = "FPS", default_value_t = 30.0)]
    pub fps: f64,

    /// Maximum per-image variation in seconds (overrides config)
    #[arg(long = "variation", value_name = "SECONDS")]
    pub variation: Option<f64>,

    /// Random seed for reproducible variation (overrides config)
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Folder of images, used in natural file-name order
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Voiceover audio file
    #[arg(value_name = "VOICE")]
    pub voice: PathBuf,

    /// Sequence name (defaults to the folder name)
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Voiceover length in seconds; probed with ffprobe when omitted
    #[arg(long = "voice-duration", value_name = "SECONDS")]
    pub voice_duration: Option<f64>,

    /// Sequence frame rate; the configured fallback is used when omitted
    #[arg(long = "fps", value_name = "FPS")]
    pub fps: Option<f64>,

    /// SRT captions to import
    #[arg(long = "captions", value_name = "SRT")]
    pub captions: Option<PathBuf>,

    /// Random seed for reproducible variation (overrides config)
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Where to write the sequence JSON (defaults to `<name>.json`)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output directory for rendered videos
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Export preset: h264, h265 or prores
    #[arg(short = 'p', long = "preset", value_name = "PRESET", default_value = "h264")]
    pub preset: String,

    /// Only export these sequences (repeatable)
    #[arg(short = 's', long = "sequence", value_name = "NAME")]
    pub sequences: Vec<String>,
}
