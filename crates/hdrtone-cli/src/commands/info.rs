//! HDR info command.
//!
//! Displays header fields and, with `--stats`, luminance statistics.

use crate::InfoArgs;
use anyhow::Result;
use hdrtone_core::Image;
use hdrtone_io::hdr::HdrFile;
use std::fs;
use std::path::Path;

/// Runs the info command over every input.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)?.len();
        let hdr = super::load_hdr(path)?;
        print_text(path, &hdr, file_size, args.stats, verbose);
        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}

fn print_text(path: &Path, hdr: &HdrFile, file_size: u64, stats: bool, verbose: u8) {
    let header = &hdr.header;
    println!("{}", path.display());
    println!("  Resolution: {}x{}", header.width, header.height);
    println!("  Encoding:   {}", header.encoding.as_str());
    println!("  File size:  {}", super::format_size(file_size));
    if let Some(e) = header.exposure {
        println!("  Exposure:   {}", e);
    }
    if verbose > 0 {
        if let Some(s) = &header.software {
            println!("  Software:   {}", s);
        }
    }

    if stats {
        let s = LuminanceStats::of(&hdr.image);
        println!("  Min Y:      {:.6}", s.min);
        println!("  Max Y:      {:.6}", s.max);
        println!("  Avg Y:      {:.6}", s.avg);
        if s.min > 0.0 {
            println!("  Range:      {:.2} stops", (s.max / s.min).log2());
        }
    }
}

/// Luminance extremes and mean of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LuminanceStats {
    min: f64,
    max: f64,
    avg: f64,
}

impl LuminanceStats {
    fn of(image: &Image) -> Self {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum = 0.0;
        for c in image.data() {
            let y = c.luminance();
            min = min.min(y);
            max = max.max(y);
            sum += y;
        }
        Self {
            min,
            max,
            avg: sum / image.size() as f64,
        }
    }
}
