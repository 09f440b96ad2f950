//! Film tile

use super::FILTER_TABLE_WIDTH;
use crate::base::*;
use crate::geometry::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Running filter-weighted mean of the radiance reaching one pixel.
///
/// The mean is updated incrementally instead of dividing a weighted sum by the
/// weight sum at the end, so a pixel that only ever sees one radiance value
/// resolves to exactly that value whatever the filter weights are.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PixelEstimate {
    /// Filter-weighted mean radiance.
    pub mean: Spectrum,

    /// Sum of filter weights.
    pub filter_weight_sum: Float,
}

impl PixelEstimate {
    /// Add a filter-weighted radiance value.
    ///
    /// * `l`      - The radiance.
    /// * `weight` - The filter weight.
    pub fn add(&mut self, l: &Spectrum, weight: Float) {
        self.combine(l, weight);
    }

    /// Fold another estimate of the same pixel into this one.
    ///
    /// * `other` - The other estimate.
    pub fn merge(&mut self, other: &PixelEstimate) {
        self.combine(&other.mean, other.filter_weight_sum);
    }

    /// Returns the estimate or black when the weights cancel out.
    pub fn resolve(&self) -> Spectrum {
        if self.filter_weight_sum == 0.0 {
            Spectrum::ZERO
        } else {
            self.mean
        }
    }

    fn combine(&mut self, mean: &Spectrum, weight: Float) {
        if weight == 0.0 {
            return;
        }

        let prev = self.filter_weight_sum;
        self.filter_weight_sum += weight;
        if prev == 0.0 {
            self.mean = *mean;
        } else if self.filter_weight_sum != 0.0 {
            let t = weight / self.filter_weight_sum;
            self.mean += (*mean - self.mean) * t;
        }
    }
}

/// Stores contributions for the pixels a render tile's samples reach. A tile
/// is owned by one worker and merged into the film when the tile is done.
pub struct FilmTile {
    /// Estimates of all pixels in `pixel_bounds`.
    pixels: Vec<PixelEstimate>,

    /// Bounds of the pixels in the final image.
    pixel_bounds: Bounds2i,

    /// Bounds of the render tile whose samples land here.
    sample_bounds: Bounds2i,

    /// Filter radius.
    filter_radius: Vector2f,

    /// Reciprocal of `filter_radius`.
    inv_filter_radius: Vector2f,

    /// Filter values over the positive quadrant of the filter extent.
    filter_table: Arc<Vec<Float>>,
}

impl FilmTile {
    /// Create a new `FilmTile`.
    ///
    /// * `pixel_bounds`  - Bounds of the pixels in the final image.
    /// * `sample_bounds` - Bounds of the render tile whose samples land here.
    /// * `filter_radius` - Filter radius.
    /// * `filter_table`  - Filter table.
    pub fn new(
        pixel_bounds: Bounds2i,
        sample_bounds: Bounds2i,
        filter_radius: Vector2f,
        filter_table: Arc<Vec<Float>>,
    ) -> Self {
        Self {
            pixels: vec![PixelEstimate::default(); max(0, pixel_bounds.area()) as usize],
            pixel_bounds,
            sample_bounds,
            filter_radius,
            inv_filter_radius: Vector2f::new(1.0 / filter_radius.x, 1.0 / filter_radius.y),
            filter_table,
        }
    }

    /// Splat a radiance sample to every pixel of the tile within the filter
    /// radius.
    ///
    /// * `p_film` - Continuous raster position of the sample.
    /// * `l`      - The radiance.
    pub fn add_sample(&mut self, p_film: &Point2f, l: &Spectrum) {
        // Compute sample's raster bounds.
        let dx = p_film.x - 0.5;
        let dy = p_film.y - 0.5;
        let x0 = max((dx - self.filter_radius.x).ceil() as Int, self.pixel_bounds.p_min.x);
        let y0 = max((dy - self.filter_radius.y).ceil() as Int, self.pixel_bounds.p_min.y);
        let x1 = min((dx + self.filter_radius.x).floor() as Int + 1, self.pixel_bounds.p_max.x);
        let y1 = min((dy + self.filter_radius.y).floor() as Int + 1, self.pixel_bounds.p_max.y);

        let table_index = |d: Float, inv_radius: Float| -> usize {
            let f = (abs(d * inv_radius) * FILTER_TABLE_WIDTH as Float).floor() as usize;
            min(f, FILTER_TABLE_WIDTH - 1)
        };

        for y in y0..y1 {
            let iy = table_index(y as Float - dy, self.inv_filter_radius.y);
            for x in x0..x1 {
                let ix = table_index(x as Float - dx, self.inv_filter_radius.x);
                let weight = self.filter_table[iy * FILTER_TABLE_WIDTH + ix];

                let offset = self.get_pixel_offset(&Point2i::new(x, y));
                self.pixels[offset].add(l, weight);
            }
        }
    }

    /// Returns the index of an image pixel within the tile.
    ///
    /// * `p` - Pixel coordinates in the image.
    pub fn get_pixel_offset(&self, p: &Point2i) -> usize {
        debug_assert!(self.pixel_bounds.contains_exclusive(p));
        let width = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        ((p.x - self.pixel_bounds.p_min.x) + (p.y - self.pixel_bounds.p_min.y) * width) as usize
    }

    /// Returns the estimate of an image pixel.
    ///
    /// * `p` - Pixel coordinates in the image.
    pub fn get_pixel(&self, p: &Point2i) -> &PixelEstimate {
        &self.pixels[self.get_pixel_offset(p)]
    }

    /// Returns the bounds of the pixels in the final image.
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }

    /// Returns the bounds of the render tile.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        self.sample_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn constant_radiance_is_reproduced_exactly(
            c in 0.0f32..100.0,
            weights in prop::collection::vec(-0.5f32..2.0, 1..50)
        ) {
            let l = Spectrum::new(c);
            let mut p = PixelEstimate::default();
            for w in weights.iter() {
                p.add(&l, *w);
            }
            let resolved = p.resolve();
            prop_assert!(resolved == l || resolved.is_black());
        }
    }

    #[test]
    fn merge_matches_adding_every_sample() {
        let mut a = PixelEstimate::default();
        a.add(&Spectrum::new(1.0), 1.0);
        a.add(&Spectrum::new(4.0), 3.0);

        let mut b = PixelEstimate::default();
        b.add(&Spectrum::new(2.0), 2.0);

        let mut merged = a;
        merged.merge(&b);
        assert_eq!(merged.filter_weight_sum, 6.0);
        assert!(approx_eq!(Float, merged.resolve()[0], 17.0 / 6.0, epsilon = 1e-6));
    }

    #[test]
    fn cancelled_weights_resolve_to_black() {
        let mut p = PixelEstimate::default();
        p.add(&Spectrum::new(3.0), 0.5);
        p.add(&Spectrum::new(3.0), -0.5);
        assert!(p.resolve().is_black());

        p.add(&Spectrum::new(2.0), 1.0);
        assert_eq!(p.resolve(), Spectrum::new(2.0));
    }

    #[test]
    fn samples_only_reach_pixels_inside_the_tile() {
        let table = Arc::new(vec![1.0; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH]);
        let bounds = Bounds2i::new(Point2i::new(2, 2), Point2i::new(4, 4));
        let mut tile = FilmTile::new(bounds, bounds, Vector2f::new(1.5, 1.5), table);

        tile.add_sample(&Point2f::new(1.5, 1.5), &Spectrum::new(1.0));
        for p in bounds {
            let reached = p.x == 2 && p.y == 2;
            assert_eq!(tile.get_pixel(&p).filter_weight_sum != 0.0, reached, "pixel {:?}", p);
        }
    }
}
