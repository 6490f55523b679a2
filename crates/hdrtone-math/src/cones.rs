//! Cone response and opponent space matrices.
//!
//! All forward matrices take CIE XYZ (or LMS for [`IPT`]) column vectors.
//! Inverses are computed once on first use.

use crate::{Mat3, Vec3};
use lazy_static::lazy_static;

/// CAT02 chromatic adaptation matrix (XYZ -> sharpened RGB).
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Hunt-Pointer-Estevez matrix (XYZ -> physiological cone space).
pub const HPE: Mat3 = Mat3::from_rows([
    [0.38971, 0.68898, -0.07868],
    [-0.22981, 1.18340, 0.04641],
    [0.0, 0.0, 1.0],
]);

/// XYZ -> LMS for D65-adapted input, first step of the IPT transform.
pub const LMS_D65: Mat3 = Mat3::from_rows([
    [0.4002, 0.7075, -0.0807],
    [-0.2280, 1.1500, 0.0612],
    [0.0, 0.0, 0.9184],
]);

/// Nonlinear L'M'S' -> IPT.
pub const IPT: Mat3 = Mat3::from_rows([
    [0.4, 0.4, 0.2],
    [4.4550, -4.8510, 0.3960],
    [0.8056, 0.3572, -1.1628],
]);

/// CIE XYZ of the D65 reference white, Y normalized to 100.
pub const D65_XYZ: Vec3 = Vec3::new(96.047, 100.0, 108.883);

lazy_static! {
    /// Inverse of [`CAT02`].
    pub static ref CAT02_INV: Mat3 = invert(&CAT02);
    /// Inverse of [`HPE`].
    pub static ref HPE_INV: Mat3 = invert(&HPE);
    /// Inverse of [`LMS_D65`].
    pub static ref LMS_D65_INV: Mat3 = invert(&LMS_D65);
    /// Inverse of [`IPT`].
    pub static ref IPT_INV: Mat3 = invert(&IPT);
}

// The constant matrices above are well conditioned; a singular result
// would be a typo in the table, so fall back to zero rather than panic.
fn invert(m: &Mat3) -> Mat3 {
    m.inverse().unwrap_or(Mat3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_identity(m: Mat3) {
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(m.m[i][j], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverses_are_exact() {
        assert_identity(CAT02 * *CAT02_INV);
        assert_identity(HPE * *HPE_INV);
        assert_identity(LMS_D65 * *LMS_D65_INV);
        assert_identity(IPT * *IPT_INV);
    }

    #[test]
    fn test_cone_rows_sum_to_one() {
        // Equal-energy white maps to equal cone responses.
        for m in [CAT02, HPE] {
            for row in m.m {
                assert_relative_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_ipt_achromatic_axis() {
        // Equal L'M'S' has no opponent signal.
        let ipt = IPT * Vec3::splat(0.5);
        assert_relative_eq!(ipt.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(ipt.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(ipt.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_d65_roundtrip_through_cat02() {
        let back = *CAT02_INV * (CAT02 * D65_XYZ);
        assert_relative_eq!(back.x, D65_XYZ.x, epsilon = 1e-9);
        assert_relative_eq!(back.z, D65_XYZ.z, epsilon = 1e-9);
    }
}
