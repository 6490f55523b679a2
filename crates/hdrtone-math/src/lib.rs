//! # hdrtone-math
//!
//! Math primitives for the tone-mapping pipeline:
//!
//! - [`Mat3`] - 3x3 double-precision matrices for color transforms
//! - [`Vec3`] - 3-component vectors for XYZ/LMS/IPT triplets
//! - Cone and opponent space matrices (CAT02, Hunt-Pointer-Estevez,
//!   D65 LMS, IPT) with their inverses
//!
//! # Design
//!
//! Matrices are stored **row-major** and applied to **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Work is done in `f64`: the pipeline divides and exponentiates values that
//! span eight orders of magnitude. Inversion is delegated to [`glam`]'s
//! `DMat3`.
//!
//! # Usage
//!
//! ```rust
//! use hdrtone_math::{Vec3, CAT02, CAT02_INV};
//!
//! let xyz = Vec3::new(95.047, 100.0, 108.883);
//! let lms = CAT02 * xyz;
//! let back = *CAT02_INV * lms;
//! assert!((back.y - 100.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cones;
mod mat3;
mod vec3;

pub use cones::*;
pub use mat3::*;
pub use vec3::*;
