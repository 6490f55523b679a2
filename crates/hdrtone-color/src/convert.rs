//! Cone and opponent space conversions.
//!
//! Free functions cover each single hop; [`TripletConvert`] chains them on
//! plain `[f64; 3]` values.
//!
//! # IPT
//!
//! ```text
//! XYZ --LMS_D65--> LMS --|v|^0.43--> L'M'S' --IPT--> IPT
//! ```
//!
//! The compression works on absolute values, so the inverse only reproduces
//! inputs whose LMS components are non-negative.

use hdrtone_math::{CAT02, CAT02_INV, HPE, HPE_INV, IPT, IPT_INV, LMS_D65, LMS_D65_INV};

/// Exponent applied to LMS before the IPT matrix.
pub const IPT_EXPONENT: f64 = 0.43;

/// XYZ to CAT02 sharpened cone responses.
#[inline]
pub fn xyz_to_cat02(xyz: [f64; 3]) -> [f64; 3] {
    CAT02.apply(xyz)
}

/// CAT02 cone responses back to XYZ.
#[inline]
pub fn cat02_to_xyz(lms: [f64; 3]) -> [f64; 3] {
    CAT02_INV.apply(lms)
}

/// XYZ to Hunt-Pointer-Estevez cone responses.
#[inline]
pub fn xyz_to_hpe(xyz: [f64; 3]) -> [f64; 3] {
    HPE.apply(xyz)
}

/// Hunt-Pointer-Estevez cone responses back to XYZ.
#[inline]
pub fn hpe_to_xyz(lms: [f64; 3]) -> [f64; 3] {
    HPE_INV.apply(lms)
}

/// XYZ to D65-adapted LMS.
#[inline]
pub fn xyz_to_lms(xyz: [f64; 3]) -> [f64; 3] {
    LMS_D65.apply(xyz)
}

/// D65-adapted LMS back to XYZ.
#[inline]
pub fn lms_to_xyz(lms: [f64; 3]) -> [f64; 3] {
    LMS_D65_INV.apply(lms)
}

/// LMS to IPT: `|v|^0.43` per channel, then the opponent matrix.
///
/// ```rust
/// use hdrtone_color::lms_to_ipt;
///
/// let [i, p, t] = lms_to_ipt([1.0, 1.0, 1.0]);
/// assert!((i - 1.0).abs() < 1e-12);
/// assert!(p.abs() < 1e-12 && t.abs() < 1e-12);
/// ```
#[inline]
pub fn lms_to_ipt(lms: [f64; 3]) -> [f64; 3] {
    IPT.apply(lms.map(|v| v.abs().powf(IPT_EXPONENT)))
}

/// IPT back to LMS: inverse opponent matrix, then `|v|^(1/0.43)`.
#[inline]
pub fn ipt_to_lms(ipt: [f64; 3]) -> [f64; 3] {
    IPT_INV.apply(ipt).map(|v| v.abs().powf(1.0 / IPT_EXPONENT))
}

/// Chainable conversions on color triplets.
///
/// # Example
///
/// ```rust
/// use hdrtone_color::TripletConvert;
///
/// let adapted = [30.0, 40.0, 50.0].xyz_to_cat02().cat02_to_xyz();
/// assert!((adapted[0] - 30.0).abs() < 1e-9);
/// ```
pub trait TripletConvert: Sized {
    /// See [`xyz_to_cat02`].
    fn xyz_to_cat02(self) -> Self;
    /// See [`cat02_to_xyz`].
    fn cat02_to_xyz(self) -> Self;
    /// See [`xyz_to_hpe`].
    fn xyz_to_hpe(self) -> Self;
    /// See [`hpe_to_xyz`].
    fn hpe_to_xyz(self) -> Self;
    /// XYZ to IPT through D65 LMS.
    fn xyz_to_ipt(self) -> Self;
    /// IPT to XYZ through D65 LMS.
    fn ipt_to_xyz(self) -> Self;
}

impl TripletConvert for [f64; 3] {
    #[inline]
    fn xyz_to_cat02(self) -> Self {
        xyz_to_cat02(self)
    }

    #[inline]
    fn cat02_to_xyz(self) -> Self {
        cat02_to_xyz(self)
    }

    #[inline]
    fn xyz_to_hpe(self) -> Self {
        xyz_to_hpe(self)
    }

    #[inline]
    fn hpe_to_xyz(self) -> Self {
        hpe_to_xyz(self)
    }

    #[inline]
    fn xyz_to_ipt(self) -> Self {
        lms_to_ipt(xyz_to_lms(self))
    }

    #[inline]
    fn ipt_to_xyz(self) -> Self {
        lms_to_xyz(ipt_to_lms(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_triplet_eq(a: [f64; 3], b: [f64; 3], rel: f64) {
        for i in 0..3 {
            assert_relative_eq!(a[i], b[i], max_relative = rel, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cat02_roundtrip() {
        let xyz = [41.2, 21.3, 1.9];
        assert_triplet_eq(cat02_to_xyz(xyz_to_cat02(xyz)), xyz, 1e-12);
    }

    #[test]
    fn test_hpe_roundtrip() {
        let xyz = [18.0, 19.0, 22.0];
        assert_triplet_eq(hpe_to_xyz(xyz_to_hpe(xyz)), xyz, 1e-12);
    }

    #[test]
    fn test_ipt_roundtrip_for_positive_lms() {
        let samples = [
            [96.047, 100.0, 108.883],
            [0.5, 0.4, 0.3],
            [12000.0, 15000.0, 9000.0],
            [1e-6, 1e-6, 1e-6],
        ];
        for xyz in samples {
            assert!(xyz_to_lms(xyz).iter().all(|&v| v >= 0.0));
            assert_triplet_eq(xyz.xyz_to_ipt().ipt_to_xyz(), xyz, 1e-6);
        }
    }

    #[test]
    fn test_ipt_lightness_monotone() {
        let dim = [10.0, 10.0, 10.0].xyz_to_ipt();
        let bright = [80.0, 80.0, 80.0].xyz_to_ipt();
        assert!(bright[0] > dim[0]);
    }

    #[test]
    fn test_rgb_xyz_reexport() {
        let xyz = crate::linear_rgb_to_xyz(0.2, 0.4, 0.6);
        let rgb = crate::xyz_to_linear_rgb(xyz[0], xyz[1], xyz[2]);
        assert_triplet_eq(rgb, [0.2, 0.4, 0.6], 1e-9);
    }
}
