//! The iCAM06 operator.
//!
//! Fairchild, Kuang and Johnson, "iCAM for high-dynamic-range image
//! rendering", SIGGRAPH 2006 research posters.

use crate::adaptation::white_image;
use crate::appearance::{combine_detail, render_appearance};
use crate::compression::tone_compress;
use crate::layers::base_layer;
use crate::luminance::{normalize, peak_luminance};
use crate::output::finalize;
use crate::{ICam06Params, TmoResult};
use hdrtone_core::{Image, Rgba16Image};
use hdrtone_ops::TileExecutor;
use std::time::Instant;
use tracing::{debug, info};

/// iCAM06 tone mapping of one HDR image.
///
/// # Example
///
/// ```rust
/// use hdrtone_core::{Color, Image};
/// use hdrtone_tmo::ICam06;
///
/// let hdr = Image::from_fn(16, 12, |x, y| {
///     let v = 10.0 + (x * y) as f64 * 40.0;
///     Color::xyz(0.95 * v, v, 1.09 * v)
/// }).unwrap();
///
/// let ldr = ICam06::with_defaults(&hdr).perform().unwrap();
/// assert_eq!(ldr.dimensions(), (16, 12));
/// ```
#[derive(Debug)]
pub struct ICam06<'a> {
    image: &'a Image,
    params: ICam06Params,
    exec: TileExecutor,
}

impl<'a> ICam06<'a> {
    /// Creates the operator; parameters are clamped into range.
    pub fn new(image: &'a Image, contrast: f64, min_clipping: f64, max_clipping: f64) -> Self {
        Self::with_params(image, ICam06Params::new(contrast, min_clipping, max_clipping))
    }

    /// Creates the operator with contrast 0.75 and clipping 0.01 / 0.99.
    pub fn with_defaults(image: &'a Image) -> Self {
        Self::with_params(image, ICam06Params::default())
    }

    /// Creates the operator from prepared parameters.
    pub fn with_params(image: &'a Image, params: ICam06Params) -> Self {
        Self {
            image,
            params,
            exec: TileExecutor::new(),
        }
    }

    /// Runs every stage on `exec` instead of the global pool.
    pub fn with_executor(mut self, exec: TileExecutor) -> Self {
        self.exec = exec;
        self
    }

    /// Parameters in effect.
    #[inline]
    pub fn params(&self) -> &ICam06Params {
        &self.params
    }

    /// Runs the pipeline and returns a raster the size of the input.
    ///
    /// Stages run strictly in order; each buffer is dropped after its last
    /// reader.
    ///
    /// # Errors
    ///
    /// [`TmoError::DegenerateRange`](crate::TmoError::DegenerateRange) when
    /// the clipping percentiles leave no range, plus allocation failures.
    pub fn perform(&self) -> TmoResult<Rgba16Image> {
        let exec = &self.exec;
        let started = Instant::now();
        info!(
            width = self.image.width(),
            height = self.image.height(),
            contrast = self.params.contrast(),
            min_clipping = self.params.min_clipping(),
            max_clipping = self.params.max_clipping(),
            threads = exec.threads(),
            tile_rows = exec.tile_rows(),
            "iCAM06 tone mapping"
        );

        let peak = peak_luminance(exec, self.image);
        let normalized = normalize(exec, self.image, peak)?;

        let base = base_layer(exec, &normalized)?;
        let white = white_image(exec, &normalized)?;
        debug!(elapsed = ?started.elapsed(), "Layers ready");

        let tone_compressed = tone_compress(exec, &base, white, self.params.contrast())?;
        let combined = combine_detail(exec, tone_compressed, &normalized, &base)?;
        drop(normalized);

        let appearance = render_appearance(exec, combined, &base)?;
        drop(base);

        let out = finalize(
            exec,
            &appearance,
            self.params.min_clipping(),
            self.params.max_clipping(),
        )?;
        info!(elapsed = ?started.elapsed(), "iCAM06 done");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdrtone_core::Color;

    #[test]
    fn test_constructor_clamps() {
        let img = Image::filled(2, 2, Color::xyz(1.0, 1.0, 1.0)).unwrap();
        let op = ICam06::new(&img, 0.1, -1.0, 5.0);
        assert_eq!(op.params().contrast(), 0.6);
        assert_eq!(op.params().min_clipping(), 0.0);
        assert_eq!(op.params().max_clipping(), 1.0);
    }

    #[test]
    fn test_defaults() {
        let img = Image::filled(2, 2, Color::xyz(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(*ICam06::with_defaults(&img).params(), ICam06Params::default());
    }

    #[test]
    fn test_single_pixel() {
        let img = Image::filled(1, 1, Color::xyz(95.0, 100.0, 108.0)).unwrap();
        let out = ICam06::with_defaults(&img).perform().unwrap();
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.pixel(0, 0)[3], u16::MAX);
    }
}
