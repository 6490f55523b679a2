//! Edge-preserving blur on a bilateral grid.
//!
//! Pixels are splatted into a coarse 3D grid indexed by position and by a
//! guide value, the grid is blurred with a `[1 4 6 4 1] / 16` kernel along
//! each axis, and the result is read back with trilinear interpolation at
//! each pixel's own (x, y, guide) coordinate. One grid cell spans
//! `sigma_space` pixels and `sigma_range` guide units, so the grid blur has
//! unit variance in cell units.
//!
//! Below [`GRID_MIN_SIGMA_SPACE`] a grid cell would cover only a few pixels
//! and the grid would outgrow the image, so the filter is evaluated directly
//! over a `3·sigma_space` window instead.
//!
//! Splatting assigns each grid row a contiguous band of image rows, so every
//! cell is accumulated in a fixed order regardless of the worker count.
//!
//! # Example
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//! use hdrtone_ops::bilateral::bilateral_y;
//!
//! // A hard luminance edge survives the blur.
//! let img = Image::from_fn(32, 8, |x, _| {
//!     let v = if x < 16 { 0.0 } else { 4.0 };
//!     Color::raw(v, v, v)
//! }).unwrap();
//! let out = bilateral_y(&img, 4.0).unwrap();
//! assert!(out.color_at(15, 4).luminance() < 0.5);
//! assert!(out.color_at(16, 4).luminance() > 3.5);
//! ```

use crate::blur::{deinterleave, interleave};
use crate::{OpsError, OpsResult};
use hdrtone_core::{Error, Image};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Empty cells around the populated grid, enough for the 5-tap kernel.
const PAD: usize = 2;

/// Grid blur taps, unit variance.
const TAPS: [f64; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Spatial sigma, in pixels, below which the filter returns its input:
/// direct neighbours would weigh less than `exp(-8)`.
pub const MIN_SIGMA_SPACE: f64 = 0.25;

/// Smallest spatial sigma, in pixels, filtered on the grid.
pub const GRID_MIN_SIGMA_SPACE: f64 = 2.0;

/// Fraction of the guide's value span used as range sigma by [`bilateral_y`].
pub const AUTO_RANGE_FRACTION: f64 = 0.1;

/// Homogeneous cell: three weighted channel sums plus the weight.
type Cell = [f64; 4];

/// Cross-bilateral blur of all three channels, guided by the second
/// channel (Y for XYZ input, log Y for a log-encoded image).
///
/// Range sigma is one tenth of the guide's value span.
pub fn bilateral_y(image: &Image, sigma_space: f64) -> OpsResult<Image> {
    let guide: Vec<f64> = image.data().iter().map(|c| c.channels()[1]).collect();
    let (lo, hi) = span(&guide);
    bilateral(image, &guide, sigma_space, (hi - lo) * AUTO_RANGE_FRACTION)
}

/// Cross-bilateral blur of `image` with an explicit per-pixel `guide`.
///
/// A non-positive `sigma_range` (flat guide) degenerates to a spatial
/// Gaussian-like blur on a single range slice.
pub fn bilateral(
    image: &Image,
    guide: &[f64],
    sigma_space: f64,
    sigma_range: f64,
) -> OpsResult<Image> {
    if !sigma_space.is_finite() || sigma_space <= 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "spatial sigma must be finite and > 0, got {sigma_space}"
        )));
    }
    if guide.len() != image.size() {
        return Err(OpsError::InvalidDimensions(format!(
            "guide has {} values for {} pixels",
            guide.len(),
            image.size()
        )));
    }
    if guide.iter().any(|g| !g.is_finite()) {
        return Err(OpsError::InvalidParameter("guide must be finite".into()));
    }
    if sigma_space < MIN_SIGMA_SPACE {
        trace!(sigma_space, "sub-pixel bilateral, passthrough");
        return Ok(image.clone());
    }

    let sigma_range = if sigma_range.is_finite() && sigma_range > 0.0 {
        sigma_range
    } else {
        1.0
    };
    let samples = interleave(image);
    if sigma_space < GRID_MIN_SIGMA_SPACE {
        debug!(sigma_space, sigma_range, "Applying direct bilateral");
        let out = direct(image.width() as usize, &samples, guide, sigma_space, sigma_range);
        return deinterleave(image, &out);
    }

    let (lo, hi) = span(guide);
    let grid = Grid::new(image.width(), image.height(), sigma_space, lo, hi, sigma_range);
    debug!(
        width = image.width(),
        height = image.height(),
        sigma_space,
        sigma_range,
        cells = grid.cells(),
        "Applying bilateral grid"
    );

    let mut data = grid.splat(&samples, guide)?;
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        data = grid.blur(&data, axis)?;
    }
    let out = grid.slice(&data, &samples, guide);
    deinterleave(image, &out)
}

/// Brute-force bilateral over a `ceil(3·sigma_space)` window, clamped to the
/// image. Each output row is computed independently.
fn direct(
    width: usize,
    samples: &[f64],
    guide: &[f64],
    sigma_space: f64,
    sigma_range: f64,
) -> Vec<f64> {
    let height = guide.len() / width;
    let radius = (3.0 * sigma_space).ceil() as usize;
    let inv_space = -0.5 / (sigma_space * sigma_space);
    let inv_range = -0.5 / (sigma_range * sigma_range);
    let mut out = vec![0.0f64; samples.len()];
    out.par_chunks_mut(width * 3).enumerate().for_each(|(y, row)| {
        let ys = y.saturating_sub(radius)..(y + radius + 1).min(height);
        for x in 0..width {
            let gc = guide[y * width + x];
            let xs = x.saturating_sub(radius)..(x + radius + 1).min(width);
            let mut acc = [0.0; 4];
            for ny in ys.clone() {
                let dy = ny as f64 - y as f64;
                for nx in xs.clone() {
                    let dx = nx as f64 - x as f64;
                    let j = ny * width + nx;
                    let dg = guide[j] - gc;
                    let w = ((dx * dx + dy * dy) * inv_space + dg * dg * inv_range).exp();
                    acc[0] += w * samples[j * 3];
                    acc[1] += w * samples[j * 3 + 1];
                    acc[2] += w * samples[j * 3 + 2];
                    acc[3] += w;
                }
            }
            // The centre tap has weight 1, so acc[3] >= 1.
            for c in 0..3 {
                row[x * 3 + c] = acc[c] / acc[3];
            }
        }
    });
    trace!(radius, "direct bilateral");
    out
}

/// Zeroed cell buffer, reporting allocation failure.
fn alloc_cells(len: usize) -> OpsResult<Vec<Cell>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        Error::allocation_failed(len.saturating_mul(std::mem::size_of::<Cell>()), e.to_string())
    })?;
    data.resize(len, [0.0; 4]);
    Ok(data)
}

fn span(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

/// Grid geometry. Cells are stored `[gy][gx][gz]`, so one grid row
/// (`gw * gd` cells) is a contiguous slab.
#[derive(Debug)]
struct Grid {
    width: usize,
    height: usize,
    sigma_space: f64,
    lo: f64,
    sigma_range: f64,
    gw: usize,
    gh: usize,
    gd: usize,
}

impl Grid {
    fn new(width: u32, height: u32, sigma_space: f64, lo: f64, hi: f64, sigma_range: f64) -> Self {
        let cells = |extent: f64, step: f64| (extent / step).floor() as usize + 1 + 2 * PAD;
        Self {
            width: width as usize,
            height: height as usize,
            sigma_space,
            lo,
            sigma_range,
            gw: cells((width - 1) as f64, sigma_space),
            gh: cells((height - 1) as f64, sigma_space),
            gd: cells(hi - lo, sigma_range),
        }
    }

    fn cells(&self) -> usize {
        self.gw * self.gh * self.gd
    }

    #[inline]
    fn slab(&self) -> usize {
        self.gw * self.gd
    }

    #[inline]
    fn space_coord(&self, p: usize) -> f64 {
        p as f64 / self.sigma_space + PAD as f64
    }

    #[inline]
    fn range_coord(&self, g: f64) -> f64 {
        (g - self.lo) / self.sigma_range + PAD as f64
    }

    /// Nearest-cell splat. Grid row `gy` owns image rows whose rounded
    /// coordinate lands on it.
    fn splat(&self, samples: &[f64], guide: &[f64]) -> OpsResult<Vec<Cell>> {
        let mut data = alloc_cells(self.cells())?;
        let slab = self.slab();
        data.par_chunks_mut(slab).enumerate().for_each(|(gy, cells)| {
            for y in 0..self.height {
                if self.space_coord(y).round() as usize != gy {
                    continue;
                }
                for x in 0..self.width {
                    let i = y * self.width + x;
                    let gx = self.space_coord(x).round() as usize;
                    let gz = self.range_coord(guide[i]).round() as usize;
                    let cell = &mut cells[gx * self.gd + gz];
                    cell[0] += samples[i * 3];
                    cell[1] += samples[i * 3 + 1];
                    cell[2] += samples[i * 3 + 2];
                    cell[3] += 1.0;
                }
            }
        });
        trace!(cells = data.len(), "bilateral splat");
        Ok(data)
    }

    /// One separable pass of the 5-tap kernel. Cells beyond the grid are
    /// empty.
    fn blur(&self, src: &[Cell], axis: Axis) -> OpsResult<Vec<Cell>> {
        let (gw, gh, gd) = (self.gw, self.gh, self.gd);
        let slab = self.slab();
        let mut dst = alloc_cells(src.len())?;
        dst.par_chunks_mut(slab).enumerate().for_each(|(gy, out)| {
            for gx in 0..gw {
                for gz in 0..gd {
                    let mut acc = [0.0; 4];
                    for (k, &w) in TAPS.iter().enumerate() {
                        let off = k as isize - 2;
                        let idx = match axis {
                            Axis::X => neighbour(gx, off, gw).map(|nx| (gy * gw + nx) * gd + gz),
                            Axis::Y => neighbour(gy, off, gh).map(|ny| (ny * gw + gx) * gd + gz),
                            Axis::Z => neighbour(gz, off, gd).map(|nz| (gy * gw + gx) * gd + nz),
                        };
                        if let Some(idx) = idx {
                            for (a, v) in acc.iter_mut().zip(src[idx]) {
                                *a += w * v;
                            }
                        }
                    }
                    out[gx * gd + gz] = acc;
                }
            }
        });
        Ok(dst)
    }

    /// Trilinear read-back at each pixel's own grid coordinate.
    ///
    /// Falls back to the unfiltered pixel where the grid carries no weight.
    fn slice(&self, data: &[Cell], samples: &[f64], guide: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0f64; samples.len()];
        let row_len = self.width * 3;
        out.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
            let fy = self.space_coord(y);
            for x in 0..self.width {
                let i = y * self.width + x;
                let fx = self.space_coord(x);
                let fz = self.range_coord(guide[i]);
                let cell = self.trilinear(data, fx, fy, fz);
                let px = &mut row[x * 3..x * 3 + 3];
                if cell[3] > f64::MIN_POSITIVE {
                    for c in 0..3 {
                        px[c] = cell[c] / cell[3];
                    }
                } else {
                    px.copy_from_slice(&samples[i * 3..i * 3 + 3]);
                }
            }
        });
        out
    }

    fn trilinear(&self, data: &[Cell], fx: f64, fy: f64, fz: f64) -> Cell {
        let (x0, tx) = split(fx, self.gw);
        let (y0, ty) = split(fy, self.gh);
        let (z0, tz) = split(fz, self.gd);
        let mut acc = [0.0; 4];
        for (dy, wy) in [(0, 1.0 - ty), (1, ty)] {
            for (dx, wx) in [(0, 1.0 - tx), (1, tx)] {
                for (dz, wz) in [(0, 1.0 - tz), (1, tz)] {
                    let w = wx * wy * wz;
                    if w == 0.0 {
                        continue;
                    }
                    let idx = ((y0 + dy) * self.gw + x0 + dx) * self.gd + z0 + dz;
                    for (a, v) in acc.iter_mut().zip(data[idx]) {
                        *a += w * v;
                    }
                }
            }
        }
        acc
    }
}

/// Index `i + off` if it lies inside `0..len`.
#[inline]
fn neighbour(i: usize, off: isize, len: usize) -> Option<usize> {
    let n = i as isize + off;
    (n >= 0 && (n as usize) < len).then_some(n as usize)
}

/// Lower corner and fraction of a continuous grid coordinate; the upper
/// corner `i + 1` always stays inside `0..len` thanks to the padding.
#[inline]
fn split(f: f64, len: usize) -> (usize, f64) {
    let i = (f.floor() as usize).min(len - 2);
    (i, f - i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hdrtone_core::Color;

    #[test]
    fn test_flat_image_unchanged() {
        let img = Image::filled(12, 9, Color::raw(1.5, -2.0, 3.25)).unwrap();
        let out = bilateral_y(&img, 2.0).unwrap();
        for (_, _, c) in out.pixels() {
            let [a, b, d] = c.channels();
            assert_relative_eq!(a, 1.5, epsilon = 1e-9);
            assert_relative_eq!(b, -2.0, epsilon = 1e-9);
            assert_relative_eq!(d, 3.25, epsilon = 1e-9);
            assert!(matches!(c, Color::Raw(_)));
        }
    }

    #[test]
    fn test_smooths_within_region() {
        // Small ripple on a plateau, far from any edge in guide terms.
        let img = Image::from_fn(24, 24, |x, y| {
            let v = 10.0 + if (x + y) % 2 == 0 { 0.01 } else { -0.01 };
            Color::raw(v, 10.0, v)
        })
        .unwrap();
        let out = bilateral_y(&img, 3.0).unwrap();
        let c = out.color_at(12, 12).channels();
        assert!((c[0] - 10.0).abs() < 0.005);
    }

    #[test]
    fn test_preserves_step_edge() {
        let img = Image::from_fn(40, 10, |x, _| {
            let v = if x < 20 { 1.0 } else { 5.0 };
            Color::raw(v, v, v)
        })
        .unwrap();
        let out = bilateral_y(&img, 5.0).unwrap();
        assert!(out.color_at(19, 5).channels()[0] < 1.2);
        assert!(out.color_at(20, 5).channels()[0] > 4.8);
    }

    #[test]
    fn test_sub_pixel_sigma_is_passthrough() {
        let img = Image::from_fn(4, 4, |x, y| {
            let v = (x + y) as f64;
            Color::raw(v, v, v)
        })
        .unwrap();
        assert_eq!(bilateral_y(&img, 0.08).unwrap(), img);
    }

    #[test]
    fn test_fine_sigma_stays_finite() {
        let img = Image::from_fn(6, 5, |x, y| {
            let v = (x * y) as f64;
            Color::raw(v, v, v)
        })
        .unwrap();
        let out = bilateral_y(&img, 0.4).unwrap();
        for (_, _, c) in out.pixels() {
            assert!(c.channels().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_direct_preserves_step_edge() {
        let img = Image::from_fn(30, 6, |x, _| {
            let v = if x < 15 { 1.0 } else { 5.0 };
            Color::raw(v, v, v)
        })
        .unwrap();
        let out = bilateral_y(&img, 1.2).unwrap();
        assert!(out.color_at(14, 3).channels()[0] < 1.05);
        assert!(out.color_at(15, 3).channels()[0] > 4.95);
    }

    #[test]
    fn test_direct_smooths_ripple() {
        let img = Image::from_fn(16, 16, |x, y| {
            let v = 10.0 + if (x + y) % 2 == 0 { 0.01 } else { -0.01 };
            Color::raw(v, 10.0, v)
        })
        .unwrap();
        let out = bilateral_y(&img, 1.5).unwrap();
        assert!((out.color_at(8, 8).channels()[0] - 10.0).abs() < 0.005);
    }

    #[test]
    fn test_thin_strip_grid_stays_small() {
        // Geometry of the base layer for a 20000x25 strip: sigma 0.5 px is
        // filtered directly and never builds a grid.
        let img = Image::from_fn(20000, 25, |x, y| {
            let v = ((x * 3 + y) % 17) as f64 * 0.25;
            Color::raw(v, v, v)
        })
        .unwrap();
        let out = bilateral_y(&img, 0.5).unwrap();
        assert_eq!(out.dimensions(), (20000, 25));

        // The finest grid the filter ever builds stays within a small
        // multiple of the pixel count, even for a thin strip.
        let pixels = 20000 * 25;
        let grid = Grid::new(20000, 25, GRID_MIN_SIGMA_SPACE, -8.0, 4.3, 1.23);
        assert!(grid.cells() <= 6 * pixels, "cells={}", grid.cells());
        let grid = Grid::new(4000, 4000, GRID_MIN_SIGMA_SPACE, -8.0, 4.3, 1.23);
        assert!(grid.cells() <= 4 * 4000 * 4000, "cells={}", grid.cells());
    }

    #[test]
    fn test_rejects_bad_input() {
        let img = Image::filled(2, 2, Color::default()).unwrap();
        assert!(bilateral_y(&img, 0.0).is_err());
        assert!(bilateral(&img, &[0.0; 3], 1.0, 1.0).is_err());
        assert!(bilateral(&img, &[0.0, 0.0, f64::NAN, 0.0], 1.0, 1.0).is_err());
    }

    #[test]
    fn test_deterministic_across_pools() {
        let img = Image::from_fn(31, 17, |x, y| {
            let v = ((x * 7 + y * 13) % 11) as f64;
            Color::raw(v, v * 0.5, -v)
        })
        .unwrap();
        let a = crate::TileExecutor::with_threads(1)
            .unwrap()
            .install(|| bilateral_y(&img, 2.5).unwrap());
        let b = crate::TileExecutor::with_threads(4)
            .unwrap()
            .install(|| bilateral_y(&img, 2.5).unwrap());
        assert_eq!(a, b);
    }
}
