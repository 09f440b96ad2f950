//! Render Tiles

use crate::base::*;
use crate::geometry::*;
use itertools::iproduct;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: usize = 16;

/// A rectangular pixel range `[min_x, max_x) x [min_y, max_y)` rendered as one
/// unit of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderTile {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl RenderTile {
    /// Create a new `RenderTile`.
    ///
    /// * `min_x` - Left column (inclusive).
    /// * `min_y` - Top row (inclusive).
    /// * `max_x` - Right column (exclusive).
    /// * `max_y` - Bottom row (exclusive).
    pub fn new(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the number of pixels covered.
    pub fn area(&self) -> usize {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// Returns the tile as pixel bounds.
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::new(
            Point2i::new(self.min_x as Int, self.min_y as Int),
            Point2i::new(self.max_x as Int, self.max_y as Int),
        )
    }

    /// Returns the pixels of the tile in scanline order.
    pub fn pixels(&self) -> impl Iterator<Item = Point2i> {
        self.bounds().into_iter()
    }
}

/// Partition an image into a row-major grid of tiles. Tiles on the right and
/// bottom edges are clipped to the image.
///
/// * `width`     - Image width in pixels.
/// * `height`    - Image height in pixels.
/// * `tile_size` - Tile edge length in pixels; must be non-zero.
pub fn partition_tiles(width: usize, height: usize, tile_size: usize) -> Vec<RenderTile> {
    assert!(tile_size > 0);

    let n_tiles_x = (width + tile_size - 1) / tile_size;
    let n_tiles_y = (height + tile_size - 1) / tile_size;

    iproduct!(0..n_tiles_y, 0..n_tiles_x)
        .map(|(ty, tx)| {
            let x0 = tx * tile_size;
            let y0 = ty * tile_size;
            RenderTile::new(x0, y0, min(x0 + tile_size, width), min(y0 + tile_size, height))
        })
        .collect()
}
