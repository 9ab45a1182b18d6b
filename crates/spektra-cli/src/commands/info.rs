//! Image info command
//!
//! Displays dimensions and format, and per-channel statistics with `--stats`.

use crate::InfoArgs;
use anyhow::{Context, Result};
use spektra_core::{PixelBuffer, CHANNELS};
use spektra_io::Format;
use std::fs;

const CHANNEL_NAMES: [&str; CHANNELS] = ["R", "G", "B", "A"];

/// Per-channel minimum, maximum and mean.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChannelStats {
    min: u8,
    max: u8,
    mean: f64,
}

pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let format = Format::detect(path).unwrap_or(Format::Unknown);
        let image = super::load_image(path)?;

        println!("{}", path.display());
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Pixels:     {}", image.pixel_count());
        println!("  File size:  {}", format_size(file_size));
        println!("  Format:     {:?}", format);
        if verbose > 0 {
            println!("  MIME type:  {}", format.mime_type());
        }

        if args.stats {
            for (name, s) in CHANNEL_NAMES.iter().zip(compute_stats(&image)) {
                println!("  {}: min {:3}  max {:3}  mean {:.2}", name, s.min, s.max, s.mean);
            }
        }

        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}

fn compute_stats(image: &PixelBuffer) -> [ChannelStats; CHANNELS] {
    let mut min = [u8::MAX; CHANNELS];
    let mut max = [u8::MIN; CHANNELS];
    let mut sum = [0u64; CHANNELS];

    for px in image.as_raw().chunks_exact(CHANNELS) {
        for c in 0..CHANNELS {
            min[c] = min[c].min(px[c]);
            max[c] = max[c].max(px[c]);
            sum[c] += px[c] as u64;
        }
    }

    let count = image.pixel_count().max(1) as f64;
    std::array::from_fn(|c| {
        if image.is_empty() {
            ChannelStats { min: 0, max: 0, mean: 0.0 }
        } else {
            ChannelStats {
                min: min[c],
                max: max[c],
                mean: sum[c] as f64 / count,
            }
        }
    })
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
