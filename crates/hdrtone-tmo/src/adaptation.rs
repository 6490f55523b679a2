//! Local white point and CAT02 chromatic adaptation.

use crate::TmoResult;
use crate::params::SURROUND;
use hdrtone_color::{D65_CAT02, cat02_to_xyz, xyz_to_cat02};
use hdrtone_core::Image;
use hdrtone_ops::{TileExecutor, blur::gaussian_blur};
use tracing::debug;

/// Local adapting white: Gaussian blur of the normalized image with sigma
/// equal to half the longer image side.
pub fn white_image(exec: &TileExecutor, normalized: &Image) -> TmoResult<Image> {
    let sigma = (normalized.max_dim() / 2) as f64;
    debug!(sigma, "Building local white");
    Ok(exec.install(|| gaussian_blur(normalized, sigma))?)
}

/// Degree of adaptation for adapting luminance `la`.
#[inline]
pub fn degree_of_adaptation(la: f64) -> f64 {
    SURROUND * (1.0 - (-(la + 42.0) / 92.0).exp() / 3.6)
}

/// Adapts `xyz` from the local `white` toward D65 in CAT02 space.
///
/// ```text
/// La = 0.2·M_w
/// D  = F·(1 − e^(−(La+42)/92) / 3.6)
/// L' = L·(L_D65·D / L_w + 1 − D)        (same for M, S)
/// ```
///
/// ```rust
/// use hdrtone_tmo::adaptation::adapt;
///
/// // A pixel equal to its D65 white stays put.
/// let d65 = [96.047, 100.0, 108.883];
/// let out = adapt(d65, d65);
/// assert!((out[1] - 100.0).abs() < 1e-9);
/// ```
pub fn adapt(xyz: [f64; 3], white: [f64; 3]) -> [f64; 3] {
    let lms = xyz_to_cat02(xyz);
    let lms_w = xyz_to_cat02(white);
    let d = degree_of_adaptation(0.2 * lms_w[1]);
    let d65 = *D65_CAT02;
    cat02_to_xyz([0, 1, 2].map(|i| lms[i] * (d65[i] * d / lms_w[i] + 1.0 - d)))
}
