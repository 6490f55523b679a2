//! # hdrtone-color
//!
//! Per-pixel color conversions used by the tone-mapping pipeline:
//!
//! - **Cone spaces** - XYZ to and from CAT02 and Hunt-Pointer-Estevez
//! - **IPT** - XYZ to D65 LMS, the 0.43 compression and the opponent axes
//! - **Display** - linear RGB to XYZ and the sRGB OETF
//! - **White point** - D65 tristimulus values and their CAT02 projection
//!
//! # Architecture
//!
//! ```text
//!       hdrtone-color
//!            |
//!     +------+------+
//!     |             |
//! hdrtone-math  hdrtone-core
//! ```
//!
//! Every function is pure and works on `[f64; 3]` triplets, so they can be
//! called from any worker without synchronization.
//!
//! # Quick Start
//!
//! ```rust
//! use hdrtone_color::convert::TripletConvert;
//!
//! let xyz = [20.0, 25.0, 30.0];
//! let back = xyz.xyz_to_ipt().ipt_to_xyz();
//! assert!((back[1] - 25.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod srgb;
pub mod white;

pub use convert::{
    TripletConvert, cat02_to_xyz, hpe_to_xyz, ipt_to_lms, lms_to_ipt, lms_to_xyz, xyz_to_cat02,
    xyz_to_hpe, xyz_to_lms,
};
pub use hdrtone_core::{linear_rgb_to_xyz, xyz_to_linear_rgb};
pub use white::{D65_CAT02, D65_XYZ};

/// Prelude with the most used conversions.
pub mod prelude {
    pub use crate::convert::TripletConvert;
    pub use crate::srgb;
    pub use crate::white::{D65_CAT02, D65_XYZ};
}
