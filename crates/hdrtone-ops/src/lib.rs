//! # hdrtone-ops
//!
//! Image operations for the tone-mapping pipeline.
//!
//! # Modules
//!
//! - [`tile`] - row-band tiling over a rayon pool, parallel max reduction
//! - [`log_op`] - per-channel `log10` / `10^v`
//! - [`blur`] - separable box blur and a three-box Gaussian
//! - [`bilateral`] - edge-preserving blur, on a bilateral grid or directly for fine sigmas
//!
//! # Example
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//! use hdrtone_ops::{TileExecutor, bilateral::bilateral_y, blur::gaussian_blur, log_op};
//!
//! let exec = TileExecutor::with_threads(2).unwrap().with_tile_rows(8);
//! let img = Image::filled(64, 48, Color::xyz(50.0, 60.0, 70.0)).unwrap();
//!
//! let log = log_op::log10(&exec, &img).unwrap();
//! let base = exec.install(|| bilateral_y(&log, 0.02 * 48.0)).unwrap();
//! let white = exec.install(|| gaussian_blur(&img, 32.0)).unwrap();
//! assert_eq!(base.dimensions(), white.dimensions());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod bilateral;
pub mod blur;
pub mod log_op;
pub mod tile;

pub use error::{OpsError, OpsResult};
pub use tile::{DEFAULT_TILE_ROWS, TileExecutor};
