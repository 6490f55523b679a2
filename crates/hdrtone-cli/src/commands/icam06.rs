//! iCAM06 command
//!
//! Tone maps one HDR file into a 16-bit PNG.

use crate::Icam06Args;
use anyhow::{Context, Result};
use hdrtone_ops::TileExecutor;
use hdrtone_tmo::ICam06;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

pub fn run(args: Icam06Args, verbose: u8, threads: usize) -> Result<()> {
    trace!(input = %args.input.display(), "icam06::run");
    let output = super::output_path(&args.input, args.output.clone())?;
    let started = Instant::now();

    let hdr = super::load_hdr(&args.input)?;
    let mut image = hdr.image;
    if args.undo_exposure {
        match hdr.header.exposure {
            Some(e) if e > 0.0 && e.is_finite() => {
                debug!(exposure = e, "Undoing exposure");
                image = image.map(|c| c.map_channels(|v| v / e))?;
            }
            Some(e) => warn!(exposure = e, "Ignoring unusable exposure"),
            None => debug!("No exposure header"),
        }
    }

    let exec = if threads > 0 {
        TileExecutor::with_threads(threads).context("Failed to configure thread pool")?
    } else {
        TileExecutor::new()
    }
    .with_tile_rows(args.tile_rows);

    let op = ICam06::new(&image, args.contrast, args.min_clip, args.max_clip).with_executor(exec);
    info!(
        contrast = op.params().contrast(),
        min_clip = op.params().min_clipping(),
        max_clip = op.params().max_clipping(),
        "Tone mapping {}",
        args.input.display()
    );
    if verbose > 0 {
        println!(
            "iCAM06 {} -> {} ({}x{})",
            args.input.display(),
            output.display(),
            image.width(),
            image.height()
        );
    }

    let ldr = op
        .perform()
        .with_context(|| format!("Tone mapping failed: {}", args.input.display()))?;
    hdrtone_io::png::write_rgba16(&output, &ldr)
        .with_context(|| format!("Failed to save: {}", output.display()))?;

    if verbose > 0 {
        println!("Done in {:.2?}.", started.elapsed());
    }
    Ok(())
}
