//! Base-10 log and exponent maps.
//!
//! The log image no longer holds tristimulus values, so it is tagged
//! [`Color::Raw`]. Exponentiating brings the channels back as XYZ.
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//! use hdrtone_ops::{TileExecutor, log_op};
//!
//! let exec = TileExecutor::new();
//! let img = Image::filled(2, 2, Color::xyz(10.0, 100.0, 1000.0)).unwrap();
//! let log = log_op::log10(&exec, &img).unwrap();
//! let [a, b, c] = log.color_at(0, 0).channels();
//! assert!((a - 1.0).abs() < 1e-12 && (b - 2.0).abs() < 1e-12 && (c - 3.0).abs() < 1e-12);
//! ```

use crate::{OpsResult, TileExecutor};
use hdrtone_core::{Color, Image};
use tracing::trace;

/// Per-channel `log10`, returned as raw channels.
pub fn log10(exec: &TileExecutor, image: &Image) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), "log10");
    exec.map_image(image, |_, _, c| {
        let [a, b, d] = c.channels().map(f64::log10);
        Color::raw(a, b, d)
    })
}

/// Per-channel `10^v`, returned as XYZ.
pub fn pow10(exec: &TileExecutor, image: &Image) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), "pow10");
    exec.map_image(image, |_, _, c| {
        Color::from_xyz(c.channels().map(|v| 10f64.powf(v)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_pow_roundtrip() {
        let exec = TileExecutor::new().with_tile_rows(1);
        let img = Image::from_fn(3, 3, |x, y| {
            Color::xyz(1e-8 + x as f64, 0.5 + y as f64 * 1000.0, 20000.0)
        })
        .unwrap();
        let back = pow10(&exec, &log10(&exec, &img).unwrap()).unwrap();
        for (x, y, c) in img.pixels() {
            let b = back.color_at(x, y);
            assert!(matches!(b, Color::Xyz { .. }));
            for (u, v) in c.channels().into_iter().zip(b.channels()) {
                assert_relative_eq!(u, v, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_log10_is_raw() {
        let exec = TileExecutor::new();
        let img = Image::filled(1, 1, Color::rgb(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(log10(&exec, &img).unwrap().color_at(0, 0), Color::raw(0.0, 0.0, 0.0));
    }
}
