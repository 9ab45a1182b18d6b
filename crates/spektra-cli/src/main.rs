//! spektra - photo adjustment from the command line
//!
//! Runs the Spektra engine over PNG and JPEG files, at full resolution for
//! export or fitted to a viewport box for previews.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use spektra_ops::{Filter, NeighborSampling};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "spektra")]
#[command(author, version, about = "Photo adjustment engine CLI")]
#[command(long_about = "
Exposure, contrast, tone regions, white balance, saturation and local
detail adjustments for PNG and JPEG images.

Every adjustment takes a value in [-100, 100]; 0 leaves the image alone.

Examples:
  spektra info photo.jpg
  spektra adjust photo.jpg -o out.jpg --exposure 30 --clarity 25
  spektra adjust photo.jpg -o out.png --preset warm.yaml --saturation -10
  spektra adjust photo.jpg -o out.jpg --preview thumb.png --max-width 800
  spektra preview photo.jpg -o thumb.png --max-width 640 --max-height 480
  spektra preset -o warm.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply adjustments at full resolution
    #[command(visible_alias = "a")]
    Adjust(AdjustArgs),

    /// Render a viewport-sized preview
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),

    /// Write an adjustment preset template
    Preset(PresetArgs),

    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

/// Adjustment values shared by `adjust` and `preview`.
///
/// Flags override values loaded from `--preset`.
#[derive(Args, Debug, Clone, Default)]
struct AdjustmentArgs {
    /// YAML preset with adjustment values
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Exposure in hundredths of a stop
    #[arg(long, allow_negative_numbers = true)]
    exposure: Option<f32>,

    /// Contrast around mid-gray
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<f32>,

    /// Highlights (pixels brighter than mid-gray)
    #[arg(long, allow_negative_numbers = true)]
    highlights: Option<f32>,

    /// Shadows (pixels darker than mid-gray)
    #[arg(long, allow_negative_numbers = true)]
    shadows: Option<f32>,

    /// Whites (brightest tones)
    #[arg(long, allow_negative_numbers = true)]
    whites: Option<f32>,

    /// Blacks (darkest tones)
    #[arg(long, allow_negative_numbers = true)]
    blacks: Option<f32>,

    /// Temperature: warm (+) or cool (-)
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f32>,

    /// Tint: magenta (+) or green (-)
    #[arg(long, allow_negative_numbers = true)]
    tint: Option<f32>,

    /// Saturation
    #[arg(long, allow_negative_numbers = true)]
    saturation: Option<f32>,

    /// Clarity: sharpen (+) or soften (-)
    #[arg(long, allow_negative_numbers = true)]
    clarity: Option<f32>,

    /// Dehaze (dark tones only)
    #[arg(long, allow_negative_numbers = true)]
    dehaze: Option<f32>,

    /// Texture: fine detail boost (+) or smoothing (-)
    #[arg(long, allow_negative_numbers = true)]
    texture: Option<f32>,

    /// Neighbor sampling for clarity and texture: in-place, snapshot, fused
    #[arg(long, default_value = "in-place")]
    sampling: NeighborSampling,
}

/// Arguments for the `adjust` command.
#[derive(Args, Debug)]
struct AdjustArgs {
    /// Input image
    input: PathBuf,

    /// Output image (.png or .jpg)
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    adjust: AdjustmentArgs,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value = "92", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Also write a fitted preview, rendered alongside the export
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview box width
    #[arg(long, default_value = "800")]
    max_width: u32,

    /// Preview box height
    #[arg(long, default_value = "600")]
    max_height: u32,
}

/// Arguments for the `preview` command.
#[derive(Args, Debug)]
struct PreviewArgs {
    /// Input image
    input: PathBuf,

    /// Output image (.png or .jpg)
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    adjust: AdjustmentArgs,

    /// Preview box width
    #[arg(long, default_value = "800")]
    max_width: u32,

    /// Preview box height
    #[arg(long, default_value = "600")]
    max_height: u32,

    /// Resampling filter: nearest, bilinear, box
    #[arg(short, long, default_value = "bilinear")]
    filter: Filter,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value = "92", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,
}

/// Arguments for the `preset` command.
#[derive(Args, Debug)]
struct PresetArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    // Values to start from instead of zeros
    #[command(flatten)]
    adjust: AdjustmentArgs,
}

/// Arguments for the `info` command.
#[derive(Args, Debug)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show per-channel statistics
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Adjust(args) => commands::adjust::run(args, cli.verbose),
        Commands::Preview(args) => commands::preview::run(args, cli.verbose),
        Commands::Preset(args) => commands::preset::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}
