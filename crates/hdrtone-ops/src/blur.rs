//! Separable box blur and its three-pass Gaussian approximation.
//!
//! Edges are clamped: samples beyond the border repeat the border pixel.
//! Work runs on the current rayon pool; wrap calls in
//! [`TileExecutor::install`](crate::TileExecutor::install) to pick a pool.
//!
//! # Example
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//! use hdrtone_ops::blur::gaussian_blur;
//!
//! let img = Image::filled(32, 16, Color::xyz(1.0, 2.0, 3.0)).unwrap();
//! let out = gaussian_blur(&img, 8.0).unwrap();
//! assert!((out.color_at(5, 5).luminance() - 2.0).abs() < 1e-9);
//! ```

use crate::{OpsError, OpsResult};
use hdrtone_core::Image;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Channels per interleaved pixel.
const CHANNELS: usize = 3;

/// Flattens an image into interleaved `[c0 c1 c2 c0 c1 c2 ...]` samples.
pub(crate) fn interleave(image: &Image) -> Vec<f64> {
    image.data().iter().flat_map(|c| c.channels()).collect()
}

/// Rebuilds an image shaped like `like` from interleaved samples, keeping
/// each pixel's color variant.
pub(crate) fn deinterleave(like: &Image, samples: &[f64]) -> OpsResult<Image> {
    let width = like.width();
    Ok(Image::from_fn(width, like.height(), |x, y| {
        let i = (y as usize * width as usize + x as usize) * CHANNELS;
        like.color_at(x, y)
            .with_channels([samples[i], samples[i + 1], samples[i + 2]])
    })?)
}

/// Box blur with a `(2 * radius + 1)` wide window in both directions.
///
/// # Example
///
/// ```rust
/// use hdrtone_ops::blur::box_blur;
///
/// let src = vec![0.5f64; 64 * 32 * 3];
/// let blurred = box_blur(&src, 64, 32, 3, 4).unwrap();
/// assert!(blurred.iter().all(|&v| (v - 0.5).abs() < 1e-12));
/// ```
pub fn box_blur(
    src: &[f64],
    width: usize,
    height: usize,
    channels: usize,
    radius: usize,
) -> OpsResult<Vec<f64>> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(
            "width, height, and channels must be > 0".into(),
        ));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| OpsError::InvalidDimensions("image dimensions overflow".into()))?;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    radius
        .checked_mul(2)
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| OpsError::InvalidParameter("radius too large".into()))?;
    trace!(width, height, radius, "box_blur");

    let temp = blur_rows(src, width, height, channels, radius);
    let transposed = transpose(&temp, width, height, channels);
    let blurred = blur_rows(&transposed, height, width, channels, radius);
    Ok(transpose(&blurred, height, width, channels))
}

/// Horizontal sliding-window pass, one row per task.
fn blur_rows(
    src: &[f64],
    width: usize,
    height: usize,
    channels: usize,
    radius: usize,
) -> Vec<f64> {
    let inv_size = 1.0 / (2 * radius + 1) as f64;
    let mut dst = vec![0.0f64; width * height * channels];

    dst.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let line = &src[y * width * channels..(y + 1) * width * channels];
            for c in 0..channels {
                let at = |x: usize| line[x.min(width - 1) * channels + c];
                // Window centred on x = 0: `radius` copies of the left edge
                // plus samples 0..=radius.
                let mut sum = line[c] * radius as f64;
                for kx in 0..=radius {
                    sum += at(kx);
                }
                for x in 0..width {
                    row[x * channels + c] = sum * inv_size;
                    sum += at(x + radius + 1) - at(x.saturating_sub(radius));
                }
            }
        });

    dst
}

/// Rows become columns.
fn transpose(src: &[f64], width: usize, height: usize, channels: usize) -> Vec<f64> {
    let mut dst = vec![0.0f64; width * height * channels];
    dst.par_chunks_mut(height * channels)
        .enumerate()
        .for_each(|(x, col)| {
            for y in 0..height {
                let s = (y * width + x) * channels;
                col[y * channels..(y + 1) * channels].copy_from_slice(&src[s..s + channels]);
            }
        });
    dst
}

/// Box radii whose three successive passes approximate a Gaussian of
/// standard deviation `sigma`.
///
/// ```rust
/// use hdrtone_ops::blur::gauss_box_radii;
///
/// assert_eq!(gauss_box_radii(0.0), [0, 0, 0]);
/// let r = gauss_box_radii(10.0);
/// assert!(r.windows(2).all(|w| w[0] <= w[1]));
/// ```
pub fn gauss_box_radii(sigma: f64) -> [usize; 3] {
    if sigma.is_nan() || sigma <= 0.0 {
        return [0; 3];
    }
    let n = 3.0;
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m = ((12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0))
        .round()
        .clamp(0.0, n) as usize;

    let mut radii = [0usize; 3];
    for (i, r) in radii.iter_mut().enumerate() {
        let w = if i < m { wl } else { wu };
        *r = ((w - 1) / 2) as usize;
    }
    radii
}

/// Gaussian blur approximated by three box passes.
///
/// `sigma` is in pixels; the result keeps each pixel's color variant.
pub fn gaussian_blur(image: &Image, sigma: f64) -> OpsResult<Image> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "gaussian sigma must be finite and >= 0, got {sigma}"
        )));
    }
    let radii = gauss_box_radii(sigma);
    debug!(
        width = image.width(),
        height = image.height(),
        sigma,
        ?radii,
        "Applying gaussian blur"
    );

    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut samples = interleave(image);
    for radius in radii {
        samples = box_blur(&samples, w, h, CHANNELS, radius)?;
    }
    deinterleave(image, &samples)
}
