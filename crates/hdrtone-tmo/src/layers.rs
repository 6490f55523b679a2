//! Base/detail decomposition.
//!
//! The base layer is an edge-preserving blur of the normalized image in the
//! log domain. The detail layer is never stored: each pixel's ratio to the
//! base layer is computed where it is consumed.

use crate::TmoResult;
use crate::response::{clamp_to_zero, fl};
use hdrtone_core::{Color, Image};
use hdrtone_ops::{TileExecutor, bilateral::bilateral_y, log_op};
use tracing::debug;

/// Bilateral spatial sigma as a fraction of the shorter image side.
pub const BASE_SIGMA_FRACTION: f64 = 0.02;

/// `10^(bilateral(log10(normalized)))`, guided by log luminance.
pub fn base_layer(exec: &TileExecutor, normalized: &Image) -> TmoResult<Image> {
    let sigma_space = BASE_SIGMA_FRACTION * normalized.min_dim() as f64;
    debug!(sigma_space, "Decomposing base layer");
    let log = log_op::log10(exec, normalized)?;
    let blurred = exec.install(|| bilateral_y(&log, sigma_space))?;
    drop(log);
    Ok(log_op::pow10(exec, &blurred)?)
}

/// Detail of one pixel: `normalized / base` per channel with non-finite
/// ratios zeroed, raised to `(FL(0.2·Y_base) + 0.8)^0.25`.
///
/// ```rust
/// use hdrtone_core::Color;
/// use hdrtone_tmo::layers::enhanced_detail;
///
/// // No detail where the base equals the input.
/// let c = Color::xyz(40.0, 50.0, 60.0);
/// let d = enhanced_detail(c, c);
/// assert!(d.iter().all(|v| (v - 1.0).abs() < 1e-12));
/// ```
#[inline]
pub fn enhanced_detail(normalized: Color, base: Color) -> [f64; 3] {
    let n = normalized.to_xyz();
    let b = base.to_xyz();
    let exponent = (fl(0.2 * b[1]) + 0.8).powf(0.25);
    [0, 1, 2].map(|i| clamp_to_zero(n[i] / b[i]).powf(exponent))
}
