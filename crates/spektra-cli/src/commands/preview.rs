//! Preview command
//!
//! Fits the image into a viewport box, then runs the engine on the fitted
//! copy. Detail adjustments therefore act at preview scale.

use crate::PreviewArgs;
use anyhow::{Context, Result};
use spektra_ops::resize::{fit_within, resize};
use spektra_ops::Engine;
use tracing::{debug, trace};

pub fn run(args: PreviewArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let adj = args.adjust.resolve()?;

    let (w, h) = fit_within(image.width(), image.height(), args.max_width, args.max_height);
    if verbose > 0 {
        println!(
            "Preview {}x{} -> {}x{} ({})",
            image.width(),
            image.height(),
            w,
            h,
            args.filter
        );
    }
    debug!(width = w, height = h, filter = %args.filter, "fitting preview");

    let fitted = resize(&image, w, h, args.filter)?;
    trace!(adjustments = %super::describe(&adj), "rendering preview");
    let output = Engine::with_sampling(args.adjust.sampling)
        .process(&fitted, &adj)
        .context("Preview render failed")?;

    super::save_image(&args.output, &output, args.quality)?;

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}
