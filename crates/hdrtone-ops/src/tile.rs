//! Row-band tiling over a rayon worker pool.
//!
//! Every parallel stage splits the image into full-width bands of
//! `tile_rows` rows, runs one task per band and joins before returning.
//! Reductions produce exactly one partial per band and fold the partials in
//! band order, so results do not depend on the worker count.
//!
//! # Example
//!
//! ```rust
//! use hdrtone_core::{Color, Image};
//! use hdrtone_ops::TileExecutor;
//!
//! let img = Image::from_fn(16, 9, |x, y| Color::xyz(0.0, (x * y) as f64, 0.0)).unwrap();
//! let exec = TileExecutor::new().with_tile_rows(4);
//! assert_eq!(exec.reduce_max(&img, |c| c.luminance()), 120.0);
//! ```

use crate::{OpsError, OpsResult};
use hdrtone_core::{Color, Image, Rect};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Default tile height in rows.
pub const DEFAULT_TILE_ROWS: u32 = 32;

/// Runs per-tile work on a fixed rayon pool.
///
/// Without an explicit thread count the global rayon pool is used.
#[derive(Debug)]
pub struct TileExecutor {
    pool: Option<rayon::ThreadPool>,
    tile_rows: u32,
}

impl Default for TileExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl TileExecutor {
    /// Executor on the global pool with [`DEFAULT_TILE_ROWS`].
    pub fn new() -> Self {
        Self {
            pool: None,
            tile_rows: DEFAULT_TILE_ROWS,
        }
    }

    /// Executor with a dedicated pool of `threads` workers.
    ///
    /// `threads == 0` falls back to the global pool.
    pub fn with_threads(threads: usize) -> OpsResult<Self> {
        if threads == 0 {
            return Ok(Self::new());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("hdrtone-{i}"))
            .build()
            .map_err(|e| OpsError::ThreadPool(e.to_string()))?;
        debug!(threads, "Built worker pool");
        Ok(Self {
            pool: Some(pool),
            tile_rows: DEFAULT_TILE_ROWS,
        })
    }

    /// Sets the tile height. Zero is treated as one.
    pub fn with_tile_rows(mut self, rows: u32) -> Self {
        self.tile_rows = rows.max(1);
        self
    }

    /// Tile height in rows.
    #[inline]
    pub fn tile_rows(&self) -> u32 {
        self.tile_rows
    }

    /// Number of workers available to this executor.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Runs `f` inside this executor's pool.
    ///
    /// Rayon iterators used by `f` are scheduled on the pool's workers.
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Splits `bounds` into row bands, top to bottom.
    pub fn tiles(&self, bounds: Rect) -> Vec<Rect> {
        bounds.split_rows(self.tile_rows).collect()
    }

    /// Calls `f` once per tile, in parallel, and waits for all of them.
    pub fn for_each_tile<F>(&self, bounds: Rect, f: F)
    where
        F: Fn(Rect) + Sync + Send,
    {
        let tiles = self.tiles(bounds);
        trace!(tiles = tiles.len(), rows = self.tile_rows, "for_each_tile");
        self.install(|| tiles.par_iter().for_each(|&tile| f(tile)));
    }

    /// Maps every tile to a value. Results come back in tile order.
    pub fn map_tiles<T, F>(&self, bounds: Rect, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Rect) -> T + Sync + Send,
    {
        let tiles = self.tiles(bounds);
        trace!(tiles = tiles.len(), rows = self.tile_rows, "map_tiles");
        self.install(|| tiles.par_iter().map(|&tile| f(tile)).collect())
    }

    /// Maximum of `f` over all pixels.
    ///
    /// Each tile folds its own maximum, then the per-tile partials are
    /// folded with `f64::max`. Returns `f64::NEG_INFINITY` only if `f`
    /// never yields a comparable value.
    pub fn reduce_max<F>(&self, image: &Image, f: F) -> f64
    where
        F: Fn(Color) -> f64 + Sync + Send,
    {
        let width = image.width() as usize;
        let partials = self.map_tiles(image.bounds(), |tile| {
            let start = tile.y as usize * width;
            let end = tile.bottom() as usize * width;
            image.data()[start..end]
                .iter()
                .map(|&c| f(c))
                .fold(f64::NEG_INFINITY, f64::max)
        });
        partials.into_iter().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Builds a new image by evaluating `f(x, y, src)` per pixel, tile by tile.
    pub fn map_image<F>(&self, src: &Image, f: F) -> OpsResult<Image>
    where
        F: Fn(u32, u32, Color) -> Color + Sync + Send,
    {
        let mut dst = Image::filled(src.width(), src.height(), Color::default())?;
        let width = src.width() as usize;
        let tiles = self.tiles(src.bounds());
        let band_len = width * self.tile_rows as usize;
        self.install(|| {
            dst.data_mut()
                .par_chunks_mut(band_len)
                .zip(tiles.par_iter())
                .for_each(|(band, tile)| {
                    let row0 = tile.y as usize * width;
                    let input = &src.data()[row0..row0 + band.len()];
                    for (i, (out, &c)) in band.iter_mut().zip(input).enumerate() {
                        *out = f((i % width) as u32, tile.y + (i / width) as u32, c);
                    }
                });
        });
        Ok(dst)
    }

    /// Rewrites `image` in place with `f(x, y, old)` per pixel.
    ///
    /// Each pixel reads only its own previous value before overwriting it.
    pub fn update_image<F>(&self, image: &mut Image, f: F)
    where
        F: Fn(u32, u32, Color) -> Color + Sync + Send,
    {
        let width = image.width() as usize;
        let tiles = self.tiles(image.bounds());
        let band_len = width * self.tile_rows as usize;
        self.install(|| {
            image
                .data_mut()
                .par_chunks_mut(band_len)
                .zip(tiles.par_iter())
                .for_each(|(band, tile)| {
                    for (i, px) in band.iter_mut().enumerate() {
                        *px = f((i % width) as u32, tile.y + (i / width) as u32, *px);
                    }
                });
        });
    }
}
