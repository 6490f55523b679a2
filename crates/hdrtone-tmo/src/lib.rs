//! # hdrtone-tmo
//!
//! iCAM06 tone mapping: HDR XYZ in, 16-bit display RGBA out.
//!
//! # Pipeline
//!
//! ```text
//! input ─► peak scan ─► normalize ─┬─► log10 ► bilateral ► 10^v ─► base ─┐
//!                                  │                                     │
//!                                  └─► gaussian ─► white ─► tone compress ◄┘
//!                                                              │
//!                       detail = (normalized / base)^e ─► × ◄──┘
//!                                                         │
//!                                             IPT colorfulness
//!                                                         │
//!                           peak ► linear RGB ► percentile clip ► sRGB ► u16
//! ```
//!
//! Every stage completes before the next starts. Parallel stages run on a
//! [`TileExecutor`](hdrtone_ops::TileExecutor), one task per row band;
//! output is identical for any worker count or tile height.
//!
//! # Example
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//! use hdrtone_ops::TileExecutor;
//! use hdrtone_tmo::ICam06;
//!
//! let hdr = Image::filled(8, 8, Color::xyz(47.5, 50.0, 54.4)).unwrap();
//! let exec = TileExecutor::with_threads(2).unwrap().with_tile_rows(4);
//! let ldr = ICam06::new(&hdr, 0.7, 0.01, 0.99)
//!     .with_executor(exec)
//!     .perform()
//!     .unwrap();
//! assert_eq!(ldr.pixel(3, 3)[3], u16::MAX);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod icam06;
mod params;

pub mod adaptation;
pub mod appearance;
pub mod compression;
pub mod layers;
pub mod luminance;
pub mod output;
pub mod response;

pub use error::{TmoError, TmoResult};
pub use icam06::ICam06;
pub use params::{
    CLIPPING_RANGE, CONTRAST_RANGE, DEFAULT_CONTRAST, DEFAULT_MAX_CLIPPING,
    DEFAULT_MIN_CLIPPING, ICam06Params, MAX_LUMINANCE, SURROUND,
};
