//! Adjust command
//!
//! Renders the full-resolution export and, with `--preview`, a fitted
//! preview from the same adjustments. Both renders run concurrently.

use crate::AdjustArgs;
use anyhow::{Context, Result};
use spektra_core::PixelBuffer;
use spektra_ops::resize::{fit_within, resize};
use spektra_ops::{Adjustments, Engine, Filter, NeighborSampling};
use tracing::{debug, info};

pub fn run(args: AdjustArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let adj = args.adjust.resolve()?;
    let sampling = args.adjust.sampling;

    if verbose > 0 {
        println!(
            "Adjusting {}x{}: {}",
            image.width(),
            image.height(),
            super::describe(&adj)
        );
    }
    info!(input = %args.input.display(), %sampling, "adjust");

    match &args.preview {
        Some(preview_path) => {
            let (pw, ph) = fit_within(image.width(), image.height(), args.max_width, args.max_height);
            debug!(width = pw, height = ph, "preview size");

            let (export, preview) = rayon::join(
                || render(&image, &adj, sampling),
                || render_preview(&image, &adj, sampling, pw, ph),
            );

            super::save_image(&args.output, &export?, args.quality)?;
            super::save_image(preview_path, &preview?, args.quality)?;

            if verbose > 0 {
                println!("Preview {}x{} -> {}", pw, ph, preview_path.display());
            }
        }
        None => {
            let export = render(&image, &adj, sampling)?;
            super::save_image(&args.output, &export, args.quality)?;
        }
    }

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}

fn render(image: &PixelBuffer, adj: &Adjustments, sampling: NeighborSampling) -> Result<PixelBuffer> {
    Engine::with_sampling(sampling)
        .process(image, adj)
        .context("Export render failed")
}

fn render_preview(
    image: &PixelBuffer,
    adj: &Adjustments,
    sampling: NeighborSampling,
    width: u32,
    height: u32,
) -> Result<PixelBuffer> {
    let fitted = resize(image, width, height, Filter::Bilinear)?;
    Engine::with_sampling(sampling)
        .process(&fitted, adj)
        .context("Preview render failed")
}
