//! Final normalization to 16-bit display RGB.
//!
//! 1. Rescale XYZ by the peak luminance and convert to linear RGB.
//! 2. Pick black and white points from percentiles of all RGB samples.
//! 3. Clip into [0, 1], apply the sRGB OETF and quantize to `u16`.

use crate::{TmoError, TmoResult};
use hdrtone_color::{srgb, xyz_to_linear_rgb};
use hdrtone_core::{Image, Rgba16Image};
use hdrtone_ops::TileExecutor;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Full-scale 16-bit code value.
pub const RANGE_MAX: u16 = u16::MAX;

/// Sorted table of linear RGB samples for order-statistic queries.
///
/// Non-finite samples are dropped when the table is built.
///
/// # Example
///
/// ```rust
/// use hdrtone_tmo::output::Percentiles;
///
/// let table = Percentiles::new(vec![0.4, 0.1, 0.3, 0.2]);
/// assert_eq!(table.percentile(0.0).unwrap(), 0.1);
/// assert_eq!(table.percentile(0.5).unwrap(), 0.3);
/// assert_eq!(table.percentile(1.0).unwrap(), 0.4);
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    samples: Vec<f64>,
}

impl Percentiles {
    /// Sorts `samples` ascending into a new table.
    pub fn new(mut samples: Vec<f64>) -> Self {
        let before = samples.len();
        samples.retain(|v| v.is_finite());
        if samples.len() != before {
            warn!(dropped = before - samples.len(), "Non-finite samples in percentile table");
        }
        samples.par_sort_unstable_by(f64::total_cmp);
        Self { samples }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the table holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at index `floor(p·n)`.
    ///
    /// The index is capped at the last sample, so `p = 1.0` returns the
    /// maximum.
    pub fn percentile(&self, p: f64) -> TmoResult<f64> {
        let n = self.samples.len();
        if n == 0 {
            return Err(TmoError::EmptyTable);
        }
        let i = ((p * n as f64).floor() as usize).min(n - 1);
        Ok(self.samples[i])
    }
}

/// Maps `v` from `[min, max]` into `[0, 1]`, clamping outside values.
#[inline]
pub fn clip(v: f64, min: f64, max: f64) -> f64 {
    let t = (v - min) / (max - min);
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// sRGB-encodes a clipped value and truncates it to a 16-bit code.
#[inline]
pub fn encode(v: f64) -> u16 {
    (srgb::oetf(v) * RANGE_MAX as f64) as u16
}

/// Converts the appearance-space image into the display raster.
///
/// # Errors
///
/// [`TmoError::DegenerateRange`] when the white point does not lie above
/// the black point, [`TmoError::EmptyTable`] when no finite sample exists.
pub fn finalize(
    exec: &TileExecutor,
    appearance: &Image,
    min_clipping: f64,
    max_clipping: f64,
) -> TmoResult<Rgba16Image> {
    let peak = exec.reduce_max(appearance, |c| c.luminance());
    let width = appearance.width() as usize;

    let rgb: Vec<[f64; 3]> = exec
        .map_tiles(appearance.bounds(), |tile| {
            let start = tile.y as usize * width;
            let end = tile.bottom() as usize * width;
            appearance.data()[start..end]
                .iter()
                .map(|c| {
                    let [x, y, z] = c.to_xyz().map(|v| v / peak);
                    xyz_to_linear_rgb(x, y, z)
                })
                .collect::<Vec<_>>()
        })
        .into_iter()
        .flatten()
        .collect();

    let table = Percentiles::new(rgb.iter().flatten().copied().collect());
    let min_rgb = table.percentile(min_clipping)?.min(0.0);
    let max_rgb = table.percentile(max_clipping)?;
    drop(table);
    debug!(peak, min_rgb, max_rgb, "Clipping range");
    if max_rgb <= min_rgb {
        return Err(TmoError::DegenerateRange {
            min: min_rgb,
            max: max_rgb,
        });
    }

    let mut out = Rgba16Image::new(appearance.width(), appearance.height())?;
    exec.install(|| {
        out.data_mut()
            .par_chunks_mut(4)
            .zip(rgb.par_iter())
            .for_each(|(px, c)| {
                for (dst, &v) in px.iter_mut().zip(c) {
                    *dst = encode(clip(v, min_rgb, max_rgb));
                }
                px[3] = RANGE_MAX;
            });
    });
    Ok(out)
}
