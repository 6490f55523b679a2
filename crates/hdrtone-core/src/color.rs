//! HDR pixel colors.
//!
//! A [`Color`] is one of three variants:
//!
//! - [`Color::Rgb`] - linear display RGB (sRGB primaries, D65)
//! - [`Color::Xyz`] - CIE 1931 tristimulus values
//! - [`Color::Raw`] - three channels with no color space attached
//!
//! Every variant answers the same three queries ([`Color::to_rgba`],
//! [`Color::to_xyza`], [`Color::to_raw`]). RGB and XYZ convert into each other
//! through the standard sRGB/D65 matrix pair; a raw color hands back its
//! channels untouched from all three queries.
//!
//! # Example
//!
//! ```rust
//! use hdrtone_core::Color;
//!
//! let c = Color::rgb(1.0, 1.0, 1.0);
//! let [_, y, _, a] = c.to_xyza();
//! assert!((y - 1.0).abs() < 1e-9);
//! assert_eq!(a, 1.0);
//! ```

/// Alpha reported by every color. HDR pixels are always opaque.
pub const OPAQUE: f64 = 1.0;

/// Rec.709 luma coefficients as an array [R, G, B].
pub const REC709_LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Calculate Rec.709 luma from RGB values.
///
/// `Y = 0.2126*R + 0.7152*G + 0.0722*B`
#[inline]
pub fn luma_rec709(rgb: [f64; 3]) -> f64 {
    rgb[0] * REC709_LUMA[0] + rgb[1] * REC709_LUMA[1] + rgb[2] * REC709_LUMA[2]
}

/// Converts linear sRGB (D65) to CIE XYZ.
#[inline]
pub fn linear_rgb_to_xyz(r: f64, g: f64, b: f64) -> [f64; 3] {
    [
        0.41239079926595948 * r + 0.35758433938387796 * g + 0.18048078840183429 * b,
        0.21263900587151036 * r + 0.71516867876775593 * g + 0.072192315360733715 * b,
        0.019330818715591851 * r + 0.11919477979462599 * g + 0.95053215224966058 * b,
    ]
}

/// Converts CIE XYZ to linear sRGB (D65).
#[inline]
pub fn xyz_to_linear_rgb(x: f64, y: f64, z: f64) -> [f64; 3] {
    [
        3.2409699419045214 * x - 1.5373831775700935 * y - 0.49861076029300328 * z,
        -0.96924363628087983 * x + 1.8759675015077207 * y + 0.041555057407175613 * z,
        0.055630079696993609 * x - 0.20397695888897657 * y + 1.0569715142428786 * z,
    ]
}

/// An HDR pixel color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Linear display RGB.
    Rgb {
        /// Red
        r: f64,
        /// Green
        g: f64,
        /// Blue
        b: f64,
    },
    /// CIE XYZ tristimulus values.
    Xyz {
        /// X
        x: f64,
        /// Y (luminance)
        y: f64,
        /// Z
        z: f64,
    },
    /// Three channels in no particular color space.
    ///
    /// Used for intermediate buffers such as log-encoded luminance, where the
    /// values are no longer tristimulus values.
    Raw([f64; 3]),
}

impl Color {
    /// Creates a linear RGB color.
    #[inline]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::Rgb { r, g, b }
    }

    /// Creates an XYZ color.
    #[inline]
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::Xyz { x, y, z }
    }

    /// Creates a raw color.
    #[inline]
    pub const fn raw(p1: f64, p2: f64, p3: f64) -> Self {
        Self::Raw([p1, p2, p3])
    }

    /// Creates an XYZ color from an array.
    #[inline]
    pub const fn from_xyz(xyz: [f64; 3]) -> Self {
        Self::xyz(xyz[0], xyz[1], xyz[2])
    }

    /// Returns linear RGB plus alpha.
    #[inline]
    pub fn to_rgba(&self) -> [f64; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, OPAQUE]
    }

    /// Returns XYZ plus alpha.
    #[inline]
    pub fn to_xyza(&self) -> [f64; 4] {
        let [x, y, z] = self.to_xyz();
        [x, y, z, OPAQUE]
    }

    /// Returns the raw stored channels plus alpha.
    #[inline]
    pub fn to_raw(&self) -> [f64; 4] {
        let [p1, p2, p3] = self.channels();
        [p1, p2, p3, OPAQUE]
    }

    /// Returns linear RGB.
    #[inline]
    pub fn to_rgb(&self) -> [f64; 3] {
        match *self {
            Self::Rgb { r, g, b } => [r, g, b],
            Self::Xyz { x, y, z } => xyz_to_linear_rgb(x, y, z),
            Self::Raw(p) => p,
        }
    }

    /// Returns XYZ.
    #[inline]
    pub fn to_xyz(&self) -> [f64; 3] {
        match *self {
            Self::Rgb { r, g, b } => linear_rgb_to_xyz(r, g, b),
            Self::Xyz { x, y, z } => [x, y, z],
            Self::Raw(p) => p,
        }
    }

    /// Returns the stored channels without any conversion.
    #[inline]
    pub fn channels(&self) -> [f64; 3] {
        match *self {
            Self::Rgb { r, g, b } => [r, g, b],
            Self::Xyz { x, y, z } => [x, y, z],
            Self::Raw(p) => p,
        }
    }

    /// Returns the XYZ luminance (Y).
    #[inline]
    pub fn luminance(&self) -> f64 {
        self.to_xyz()[1]
    }

    /// Returns a color of the same variant holding `channels`.
    #[inline]
    pub fn with_channels(&self, channels: [f64; 3]) -> Self {
        let [p1, p2, p3] = channels;
        match self {
            Self::Rgb { .. } => Self::rgb(p1, p2, p3),
            Self::Xyz { .. } => Self::xyz(p1, p2, p3),
            Self::Raw(_) => Self::raw(p1, p2, p3),
        }
    }

    /// Applies `f` to each stored channel, keeping the variant.
    #[inline]
    pub fn map_channels(&self, f: impl Fn(f64) -> f64) -> Self {
        match *self {
            Self::Rgb { r, g, b } => Self::rgb(f(r), f(g), f(b)),
            Self::Xyz { x, y, z } => Self::xyz(f(x), f(y), f(z)),
            Self::Raw([p1, p2, p3]) => Self::raw(f(p1), f(p2), f(p3)),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::xyz(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb_white_is_d65() {
        let [x, y, z] = Color::rgb(1.0, 1.0, 1.0).to_xyz();
        assert_relative_eq!(x, 0.95046, epsilon = 1e-4);
        assert_relative_eq!(y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(z, 1.08906, epsilon = 1e-4);
    }

    #[test]
    fn test_rgb_xyz_roundtrip() {
        let c = Color::rgb(0.8, 0.2, 3.5);
        let back = Color::from_xyz(c.to_xyz()).to_rgb();
        assert_relative_eq!(back[0], 0.8, epsilon = 1e-9);
        assert_relative_eq!(back[1], 0.2, epsilon = 1e-9);
        assert_relative_eq!(back[2], 3.5, epsilon = 1e-9);
    }

    #[test]
    fn test_raw_is_passthrough() {
        let c = Color::raw(-1.0, 2.0, 3.0);
        assert_eq!(c.to_rgba(), [-1.0, 2.0, 3.0, OPAQUE]);
        assert_eq!(c.to_xyza(), [-1.0, 2.0, 3.0, OPAQUE]);
        assert_eq!(c.to_raw(), [-1.0, 2.0, 3.0, OPAQUE]);
    }

    #[test]
    fn test_raw_triple_of_typed_colors() {
        assert_eq!(Color::rgb(1.0, 2.0, 3.0).to_raw(), [1.0, 2.0, 3.0, OPAQUE]);
        assert_eq!(Color::xyz(4.0, 5.0, 6.0).to_raw(), [4.0, 5.0, 6.0, OPAQUE]);
    }

    #[test]
    fn test_map_channels_keeps_variant() {
        let c = Color::xyz(1.0, 10.0, 100.0).map_channels(|v| v * 2.0);
        assert_eq!(c, Color::xyz(2.0, 20.0, 200.0));
        assert_eq!(Color::raw(1.0, 2.0, 3.0).with_channels([0.0; 3]), Color::raw(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_luma() {
        assert_relative_eq!(luma_rec709([1.0, 1.0, 1.0]), 1.0, epsilon = 1e-12);
        assert!(luma_rec709([0.0, 1.0, 0.0]) > luma_rec709([1.0, 0.0, 0.0]));
    }
}
