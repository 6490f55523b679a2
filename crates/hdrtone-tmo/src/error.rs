//! Error types for the tone-mapping pipeline.

use hdrtone_ops::OpsError;
use thiserror::Error;

/// Error type for tone mapping.
#[derive(Error, Debug)]
pub enum TmoError {
    /// Intermediate image could not be built.
    #[error(transparent)]
    Image(#[from] hdrtone_core::Error),

    /// A filter or tile operation failed.
    #[error(transparent)]
    Ops(#[from] OpsError),

    /// Percentile query on a table with no samples.
    #[error("percentile table is empty")]
    EmptyTable,

    /// The clipping window has no width, so values can't be rescaled.
    #[error("degenerate clipping range: max {max} <= min {min}")]
    DegenerateRange {
        /// Black point (lower clip).
        min: f64,
        /// White point (upper clip).
        max: f64,
    },
}

/// Result type for tone mapping.
pub type TmoResult<T> = Result<T, TmoError>;
