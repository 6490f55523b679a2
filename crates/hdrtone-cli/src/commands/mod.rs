//! CLI command implementations

pub mod icam06;
pub mod info;

use anyhow::{Context, Result, bail};
use hdrtone_io::{Format, hdr::HdrFile};
use std::path::{Path, PathBuf};

/// Load an HDR image from path
pub fn load_hdr(path: &Path) -> Result<HdrFile> {
    match Format::from_path(path) {
        Some(Format::Hdr) | None => {}
        Some(other) => bail!("{}: {:?} is not an HDR input", path.display(), other),
    }
    hdrtone_io::hdr::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Output path for `input`, defaulting to a `.png` sibling.
pub fn output_path(input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| input.with_extension("png"));
    if Format::from_path(&path) != Some(Format::Png) {
        bail!("Output must be a .png file: {}", path.display());
    }
    Ok(path)
}

/// Format file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_default() {
        let out = output_path(Path::new("shots/memorial.hdr"), None).unwrap();
        assert_eq!(out, PathBuf::from("shots/memorial.png"));
    }

    #[test]
    fn test_output_path_must_be_png() {
        assert!(output_path(Path::new("a.hdr"), Some("b.tif".into())).is_err());
        assert!(output_path(Path::new("a.hdr"), Some("b.PNG".into())).is_ok());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_load_rejects_png_input() {
        assert!(load_hdr(Path::new("picture.png")).is_err());
    }
}
