//! Rectangle type used for image bounds and tiles.
//!
//! Origin (0, 0) is the top-left corner, X grows right, Y grows down.
//! Rectangles are inclusive on the left/top edges and exclusive on the
//! right/bottom edges.
//!
//! ```rust
//! use hdrtone_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! assert_eq!((rect.right(), rect.bottom()), (110, 70));
//! ```

/// A rectangle defined by origin (x, y) and dimensions (width, height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin with the given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns the X coordinate of the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Splits this rectangle into full-width horizontal bands of at most
    /// `rows` rows each, top to bottom. The last band may be shorter.
    ///
    /// ```rust
    /// use hdrtone_core::Rect;
    ///
    /// let bands: Vec<_> = Rect::from_size(8, 5).split_rows(2).collect();
    /// assert_eq!(bands.len(), 3);
    /// assert_eq!(bands[2], Rect::new(0, 4, 8, 1));
    /// ```
    pub fn split_rows(&self, rows: u32) -> impl Iterator<Item = Rect> + '_ {
        let rows = rows.max(1);
        (self.y..self.bottom())
            .step_by(rows as usize)
            .map(move |y| Rect::new(self.x, y, self.width, rows.min(self.bottom() - y)))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.to_string(), "Rect(10, 20, 100x50)");
    }

    #[test]
    fn test_split_rows_covers_every_row_once() {
        let bounds = Rect::from_size(7, 13);
        for rows in 1..=14 {
            let bands: Vec<_> = bounds.split_rows(rows).collect();
            let total: u32 = bands.iter().map(|b| b.height).sum();
            assert_eq!(total, bounds.height);
            assert!(bands.iter().all(|b| b.width == bounds.width && b.height <= rows));
            for pair in bands.windows(2) {
                assert_eq!(pair[0].bottom(), pair[1].y);
            }
        }
    }

    #[test]
    fn test_split_rows_zero_is_one() {
        assert_eq!(Rect::from_size(2, 3).split_rows(0).count(), 3);
    }
}
