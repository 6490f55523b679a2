//! Operator parameters.
//!
//! Out-of-range values are clamped, never rejected:
//!
//! | parameter      | range        | default |
//! |----------------|--------------|---------|
//! | `contrast`     | [0.6, 0.85]  | 0.75    |
//! | `min_clipping` | [0, 1]       | 0.01    |
//! | `max_clipping` | [0, 1]       | 0.99    |

use std::ops::RangeInclusive;

/// Maximum working luminance in cd/m².
pub const MAX_LUMINANCE: f64 = 20000.0;

/// Surround factor, 1.0 for an average surround.
pub const SURROUND: f64 = 1.0;

/// Valid contrast exponents.
pub const CONTRAST_RANGE: RangeInclusive<f64> = 0.6..=0.85;

/// Valid clipping percentiles.
pub const CLIPPING_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Default contrast exponent.
pub const DEFAULT_CONTRAST: f64 = 0.75;

/// Default black-point percentile.
pub const DEFAULT_MIN_CLIPPING: f64 = 0.01;

/// Default white-point percentile.
pub const DEFAULT_MAX_CLIPPING: f64 = 0.99;

/// Tunable parameters of [`ICam06`](crate::ICam06).
///
/// # Example
///
/// ```rust
/// use hdrtone_tmo::ICam06Params;
///
/// let p = ICam06Params::new(2.0, -1.0, 5.0);
/// assert_eq!(p.contrast(), 0.85);
/// assert_eq!(p.min_clipping(), 0.0);
/// assert_eq!(p.max_clipping(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ICam06Params {
    contrast: f64,
    min_clipping: f64,
    max_clipping: f64,
}

impl ICam06Params {
    /// Creates parameters, clamping each value into its valid range.
    ///
    /// NaN falls back to the default for that parameter.
    pub fn new(contrast: f64, min_clipping: f64, max_clipping: f64) -> Self {
        Self {
            contrast: clamp(contrast, &CONTRAST_RANGE, DEFAULT_CONTRAST),
            min_clipping: clamp(min_clipping, &CLIPPING_RANGE, DEFAULT_MIN_CLIPPING),
            max_clipping: clamp(max_clipping, &CLIPPING_RANGE, DEFAULT_MAX_CLIPPING),
        }
    }

    /// Cone and rod response exponent.
    #[inline]
    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    /// Percentile used as black point.
    #[inline]
    pub fn min_clipping(&self) -> f64 {
        self.min_clipping
    }

    /// Percentile used as white point.
    #[inline]
    pub fn max_clipping(&self) -> f64 {
        self.max_clipping
    }
}

impl Default for ICam06Params {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRAST, DEFAULT_MIN_CLIPPING, DEFAULT_MAX_CLIPPING)
    }
}

fn clamp(v: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if v.is_nan() {
        fallback
    } else {
        v.clamp(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = ICam06Params::default();
        assert_eq!(p.contrast(), 0.75);
        assert_eq!(p.min_clipping(), 0.01);
        assert_eq!(p.max_clipping(), 0.99);
    }

    #[test]
    fn test_contrast_clamped() {
        assert_eq!(ICam06Params::new(2.0, 0.01, 0.99).contrast(), 0.85);
        assert_eq!(ICam06Params::new(0.1, 0.01, 0.99).contrast(), 0.6);
        assert_eq!(ICam06Params::new(0.7, 0.01, 0.99).contrast(), 0.7);
    }

    #[test]
    fn test_clipping_clamped() {
        let p = ICam06Params::new(0.75, -1.0, 5.0);
        assert_eq!(p.min_clipping(), 0.0);
        assert_eq!(p.max_clipping(), 1.0);
    }

    #[test]
    fn test_nan_uses_default() {
        let p = ICam06Params::new(f64::NAN, f64::NAN, f64::NAN);
        assert_eq!(p, ICam06Params::default());
    }

    #[test]
    fn test_inverted_clipping_kept() {
        let p = ICam06Params::new(0.75, 0.9, 0.1);
        assert_eq!(p.min_clipping(), 0.9);
        assert_eq!(p.max_clipping(), 0.1);
    }
}
