//! # hdrtone-core
//!
//! Core types shared by every hdrtone crate:
//!
//! - [`Color`] - Closed set of HDR pixel colors (linear RGB, XYZ, raw)
//! - [`Image`] - Immutable-bounds HDR image made of [`Color`] values
//! - [`Rgba16Image`] - Fixed-point display raster produced by tone mapping
//! - [`Rect`] - Rectangular regions used for tiling
//! - [`Error`] - Error type for buffer construction and access
//!
//! ## Crate Structure
//!
//! ```text
//! hdrtone-core (this crate)
//!    ^
//!    |
//!    +-- hdrtone-math (matrices, cone spaces)
//!    +-- hdrtone-color (per-pixel conversions)
//!    +-- hdrtone-ops (tiling, blurs)
//!    +-- hdrtone-io (RGBE / PNG)
//!    +-- hdrtone-tmo (iCAM06)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod image;
pub mod rect;

pub use color::{
    linear_rgb_to_xyz, luma_rec709, xyz_to_linear_rgb, Color, OPAQUE, REC709_LUMA,
};
pub use error::{Error, Result};
pub use image::{Image, Rgba16Image};
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use hdrtone_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, Rgba16Image};
    pub use crate::rect::Rect;
}
