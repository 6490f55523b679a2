//! # hdrtone-io
//!
//! File formats at the edges of the tone mapping pipeline.
//!
//! | Format | Read | Write | Pixels |
//! |--------|------|-------|--------|
//! | Radiance HDR (`.hdr`, `.pic`) | yes | yes | RGBE or XYZE, flat or RLE |
//! | PNG | no | yes | 16-bit RGBA |
//!
//! # Example
//!
//! ```rust,ignore
//! use hdrtone_io::{hdr, png};
//!
//! let file = hdr::read("memorial.hdr")?;
//! let ldr = hdrtone_tmo::ICam06::with_defaults(&file.image).perform()?;
//! png::write_rgba16("memorial.png", &ldr)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

pub mod hdr;
pub mod png;

pub use error::{IoError, IoResult};

use std::path::Path;

/// Image formats known by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Radiance RGBE / XYZE.
    Hdr,
    /// Portable Network Graphics.
    Png,
}

impl Format {
    /// Detects the format from a path's extension (case-insensitive).
    ///
    /// ```rust
    /// use hdrtone_io::Format;
    ///
    /// assert_eq!(Format::from_path("a/b.HDR"), Some(Format::Hdr));
    /// assert_eq!(Format::from_path("out.png"), Some(Format::Png));
    /// assert_eq!(Format::from_path("x.exr"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "hdr" | "pic" | "rgbe" => Some(Self::Hdr),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}
