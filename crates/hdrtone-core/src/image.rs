//! Image buffer types.
//!
//! - [`Image`] - HDR image of [`Color`] values, row-major, top-to-bottom
//! - [`Rgba16Image`] - 16-bit-per-channel RGBA display raster
//!
//! Bounds are fixed at construction and zero-area images are rejected, so
//! every image holds at least one pixel.
//!
//! # Usage
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//!
//! let img = Image::filled(4, 2, Color::xyz(1.0, 2.0, 3.0)).unwrap();
//! assert_eq!(img.size(), 8);
//! assert_eq!(img.color_at(3, 1), Color::xyz(1.0, 2.0, 3.0));
//! ```

use crate::{Color, Error, Rect, Result};
use rayon::prelude::*;

/// Allocates a vector for `len` elements, reporting allocation failure.
fn try_alloc<T>(len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        Error::allocation_failed(len.saturating_mul(std::mem::size_of::<T>()), e.to_string())
    })?;
    Ok(data)
}

fn check_dimensions(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "zero-area image"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))
}

/// HDR image: a width x height grid of [`Color`] values.
#[derive(Clone, PartialEq)]
pub struct Image {
    data: Vec<Color>,
    width: u32,
    height: u32,
}

impl Image {
    /// Creates an image filled with one color.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for a zero-area image,
    /// [`Error::AllocationFailed`] if the buffer can't be allocated.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        let mut data = try_alloc(len)?;
        data.resize(len, color);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image from existing pixel data (row-major).
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdrtone_core::{Color, Image};
    ///
    /// let pixels = vec![Color::rgb(0.5, 0.5, 0.5); 6];
    /// let img = Image::from_data(3, 2, pixels).unwrap();
    /// assert_eq!(img.dimensions(), (3, 2));
    /// ```
    pub fn from_data(width: u32, height: u32, data: Vec<Color>) -> Result<Self> {
        let expected = check_dimensions(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel in parallel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> Color + Sync,
    {
        let len = check_dimensions(width, height)?;
        let mut data = try_alloc(len)?;
        data.resize(len, Color::default());
        data.par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = f(x as u32, y as u32);
                }
            });
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the shorter side.
    #[inline]
    pub fn min_dim(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Returns the longer side.
    #[inline]
    pub fn max_dim(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Returns the color at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Returns the pixel data in row-major order.
    #[inline]
    pub fn data(&self) -> &[Color] {
        &self.data
    }

    /// Returns the pixel data mutably.
    ///
    /// Bounds cannot change through this slice, only pixel values.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [Color] {
        &mut self.data
    }

    /// Returns a row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[Color] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.color_at(x, y))))
    }

    /// Builds a new image by applying `f` to every pixel in parallel.
    pub fn map<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(Color) -> Color + Sync,
    {
        let mut data = try_alloc(self.data.len())?;
        self.data.par_iter().map(|&c| f(c)).collect_into_vec(&mut data);
        Ok(Self {
            data,
            width: self.width,
            height: self.height,
        })
    }

    /// Returns an error unless `other` has the same dimensions.
    pub fn ensure_same_size(&self, other: &Image) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// 16-bit-per-channel RGBA raster, interleaved `[R G B A R G B A ...]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Rgba16Image {
    data: Vec<u16>,
    width: u32,
    height: u32,
}

impl Rgba16Image {
    /// Creates a transparent black raster.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = check_dimensions(width, height)?
            .checked_mul(4)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "sample count overflows"))?;
        let mut data = try_alloc(len)?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raster dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns a rectangle covering the entire raster.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns the pixel at (x, y) as `[R, G, B, A]`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u16; 4] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u16; 4];
        px.copy_from_slice(&self.data[offset..offset + 4]);
        px
    }

    /// Sets the pixel at (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u16; 4]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data[offset..offset + 4].copy_from_slice(&px);
    }

    /// Rec.709 luma of the pixel at (x, y), on the 16-bit scale.
    #[inline]
    pub fn luma(&self, x: u32, y: u32) -> f64 {
        let [r, g, b, _] = self.pixel(x, y);
        crate::luma_rec709([r as f64, g as f64, b as f64])
    }

    /// Returns the interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Returns the interleaved samples mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }
}

impl std::fmt::Debug for Rgba16Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rgba16Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_filled() {
        let img = Image::filled(10, 10, Color::xyz(1.0, 0.5, 0.25)).unwrap();
        assert_eq!(img.color_at(0, 0), Color::xyz(1.0, 0.5, 0.25));
        assert_eq!(img.color_at(9, 9), Color::xyz(1.0, 0.5, 0.25));
        assert_eq!(img.size(), 100);
    }

    #[test]
    fn test_image_zero_area_rejected() {
        assert!(Image::filled(0, 10, Color::default()).is_err());
        assert!(Image::filled(10, 0, Color::default()).is_err());
        assert!(Rgba16Image::new(0, 0).is_err());
    }

    #[test]
    fn test_image_from_data_wrong_size() {
        let result = Image::from_data(10, 10, vec![Color::default(); 99]);
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_image_from_fn_layout() {
        let img = Image::from_fn(5, 3, |x, y| Color::raw(x as f64, y as f64, 0.0)).unwrap();
        assert_eq!(img.color_at(4, 2), Color::raw(4.0, 2.0, 0.0));
        assert_eq!(img.row(1)[3], Color::raw(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_image_map() {
        let img = Image::filled(3, 3, Color::xyz(2.0, 4.0, 8.0)).unwrap();
        let half = img.map(|c| c.map_channels(|v| v / 2.0)).unwrap();
        assert_eq!(half.color_at(1, 1), Color::xyz(1.0, 2.0, 4.0));
        assert_eq!(half.dimensions(), img.dimensions());
    }

    #[test]
    fn test_image_min_max_dim() {
        let img = Image::filled(7, 3, Color::default()).unwrap();
        assert_eq!(img.min_dim(), 3);
        assert_eq!(img.max_dim(), 7);
    }

    #[test]
    fn test_rgba16_set_get() {
        let mut img = Rgba16Image::new(4, 4).unwrap();
        img.set_pixel(2, 3, [1, 2, 3, u16::MAX]);
        assert_eq!(img.pixel(2, 3), [1, 2, 3, u16::MAX]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(img.data().len(), 64);
    }
}
