//! Shared scalar response functions.

/// Luminance-level adaptation factor `F_L` for adapting luminance `la`.
///
/// ```text
/// k  = 1 / (5·La + 1)
/// FL = 0.2·k⁴·(5·La) + 0.1·(1 − k⁴)²·(5·La)^(1/3)
/// ```
///
/// ```rust
/// use hdrtone_tmo::response::fl;
///
/// assert_eq!(fl(0.0), 0.0);
/// assert!(fl(100.0) > fl(10.0));
/// ```
#[inline]
pub fn fl(la: f64) -> f64 {
    let la5 = 5.0 * la;
    let k4 = (1.0 / (la5 + 1.0)).powi(4);
    0.2 * k4 * la5 + 0.1 * (1.0 - k4).powi(2) * la5.cbrt()
}

/// Replaces NaN and ±∞ with 0; finite values pass through unchanged.
#[inline]
pub fn clamp_to_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Michaelis-Menten style compression shared by cone and rod responses.
#[inline]
pub(crate) fn compress(pow: f64) -> f64 {
    400.0 * pow / (27.13 + pow)
}
