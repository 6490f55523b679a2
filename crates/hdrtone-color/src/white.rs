//! Reference white point.
//!
//! The chromatic adaptation step scales each pixel's cone responses toward
//! the D65 white expressed in CAT02 space. Both forms are built once on
//! first access and never change afterwards.

use crate::convert::xyz_to_cat02;
use lazy_static::lazy_static;

lazy_static! {
    /// D65 tristimulus values, Y = 100.
    pub static ref D65_XYZ: [f64; 3] = hdrtone_math::D65_XYZ.to_array();

    /// D65 white in CAT02 cone space.
    pub static ref D65_CAT02: [f64; 3] = xyz_to_cat02(*D65_XYZ);
}
