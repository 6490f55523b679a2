//! Peak luminance scan and input normalization.

use crate::TmoResult;
use crate::params::MAX_LUMINANCE;
use hdrtone_core::{Color, Image};
use hdrtone_ops::TileExecutor;
use tracing::debug;

/// Smallest normalized channel value; keeps the log domain finite.
pub const MIN_NORMALIZED: f64 = 1e-8;

/// Peak input luminance, never below [`MAX_LUMINANCE`].
pub fn peak_luminance(exec: &TileExecutor, image: &Image) -> f64 {
    let peak = exec.reduce_max(image, |c| c.luminance()).max(MAX_LUMINANCE);
    debug!(peak, "Scanned input luminance");
    peak
}

/// Rescales every XYZ channel by `MAX_LUMINANCE / peak` and clamps it into
/// `[1e-8, MAX_LUMINANCE]`.
pub fn normalize(exec: &TileExecutor, image: &Image, peak: f64) -> TmoResult<Image> {
    Ok(exec.map_image(image, |_, _, c| {
        Color::from_xyz(
            c.to_xyz()
                .map(|v| (v / peak * MAX_LUMINANCE).clamp(MIN_NORMALIZED, MAX_LUMINANCE)),
        )
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_peak_floor() {
        let exec = TileExecutor::new();
        let img = Image::filled(3, 3, Color::xyz(1.0, 50.0, 1.0)).unwrap();
        assert_eq!(peak_luminance(&exec, &img), MAX_LUMINANCE);
    }

    #[test]
    fn test_peak_above_floor() {
        let exec = TileExecutor::new().with_tile_rows(1);
        let img = Image::from_fn(4, 4, |x, y| {
            let v = if (x, y) == (3, 2) { 80000.0 } else { 10.0 };
            Color::xyz(v, v, v)
        })
        .unwrap();
        assert_eq!(peak_luminance(&exec, &img), 80000.0);
    }

    #[test]
    fn test_normalize_clamps() {
        let exec = TileExecutor::new();
        let img = Image::from_data(
            3,
            1,
            vec![
                Color::xyz(0.0, -5.0, 40000.0),
                Color::xyz(10.0, 20.0, 30.0),
                Color::rgb(1.0, 1.0, 1.0),
            ],
        )
        .unwrap();
        let out = normalize(&exec, &img, 40000.0).unwrap();
        assert_eq!(out.color_at(0, 0), Color::xyz(MIN_NORMALIZED, MIN_NORMALIZED, MAX_LUMINANCE));
        for (got, want) in out.color_at(1, 0).channels().into_iter().zip([5.0, 10.0, 15.0]) {
            assert_relative_eq!(got, want, max_relative = 1e-12);
        }
        let [_, y, _] = out.color_at(2, 0).channels();
        assert_relative_eq!(y, 0.5, epsilon = 1e-9);
    }
}
