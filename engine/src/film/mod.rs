//! Film

mod film_tile;

use crate::base::*;
use crate::filter::*;
use crate::geometry::*;
use crate::spectrum::*;
use arc_swap::ArcSwap;
use itertools::iproduct;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

// Re-export.
pub use film_tile::*;

/// Filter table width.
pub const FILTER_TABLE_WIDTH: usize = 16;

/// Post-processing applied to the normalized image every time the display
/// buffer is rebuilt (e.g. denoising or outlier rejection).
pub trait FilmPostProcess {
    /// Process the image in place.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    /// * `image`  - Row-major pixel values.
    fn process(&self, width: usize, height: usize, image: &mut [Spectrum]);
}

/// Atomic reference counted `FilmPostProcess`.
pub type ArcFilmPostProcess = Arc<dyn FilmPostProcess + Send + Sync>;

/// Accumulates radiance estimates from every pass into a progressively
/// refined image.
///
/// Workers never write the image directly. Each render tile collects its
/// samples in a `FilmTile` which is handed back with `merge_film_tile()`; the
/// leader folds the tiles of a pass into the image in raster order, so the
/// result does not depend on which worker finished first.
pub struct Film {
    /// Image width in pixels.
    width: usize,

    /// Image height in pixels.
    height: usize,

    /// Filter function to use for image reconstruction from samples.
    filter: ArcFilter,

    /// Filter values over the positive quadrant of the filter extent.
    filter_table: Arc<Vec<Float>>,

    /// Optional post-process applied when scaling.
    post_process: Option<ArcFilmPostProcess>,

    /// Accumulated estimates of every completed pass.
    pixels: Mutex<Vec<PixelEstimate>>,

    /// Tiles finished during the current pass.
    pending_tiles: Mutex<Vec<FilmTile>>,

    /// Number of completed passes.
    sample_count: AtomicUsize,

    /// Normalized image from the last completed pass.
    display: ArcSwap<Vec<Spectrum>>,
}

impl Film {
    /// Create a new `Film`.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    /// * `filter` - Filter function to use for image reconstruction from samples.
    pub fn new(width: usize, height: usize, filter: ArcFilter) -> Self {
        // Precompute filter weight table.
        let radius = filter.get_data().radius;
        let inv_width = 1.0 / FILTER_TABLE_WIDTH as Float;
        let filter_table = iproduct!(0..FILTER_TABLE_WIDTH, 0..FILTER_TABLE_WIDTH)
            .map(|(y, x)| {
                filter.evaluate(&Point2f::new(
                    (x as Float + 0.5) * radius.x * inv_width,
                    (y as Float + 0.5) * radius.y * inv_width,
                ))
            })
            .collect();

        let n = width * height;
        Self {
            width,
            height,
            filter,
            filter_table: Arc::new(filter_table),
            post_process: None,
            pixels: Mutex::new(vec![PixelEstimate::default(); n]),
            pending_tiles: Mutex::new(Vec::new()),
            sample_count: AtomicUsize::new(0),
            display: ArcSwap::from_pointee(vec![Spectrum::ZERO; n]),
        }
    }

    /// Apply a post-process whenever the display buffer is rebuilt.
    ///
    /// * `post_process` - The post-process.
    pub fn with_post_process(mut self, post_process: Option<ArcFilmPostProcess>) -> Self {
        self.post_process = post_process;
        self
    }

    /// Returns an empty film of a different resolution that reconstructs with
    /// the same filter and post-process.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn resized(&self, width: usize, height: usize) -> Self {
        Self::new(width, height, Arc::clone(&self.filter)).with_post_process(self.post_process.clone())
    }

    /// Returns the bounds of the whole image.
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i::new(0, 0), Point2i::new(self.width as Int, self.height as Int))
    }

    /// Returns an empty `FilmTile` covering every pixel that samples taken in
    /// `sample_bounds` can reach.
    ///
    /// * `sample_bounds` - Pixel bounds of the render tile.
    pub fn get_film_tile(&self, sample_bounds: &Bounds2i) -> FilmTile {
        let radius = self.filter.get_data().radius;

        // Bound image pixels that samples in `sample_bounds` contribute to.
        let p0 = Point2i::new(
            (sample_bounds.p_min.x as Float - 0.5 - radius.x).ceil() as Int,
            (sample_bounds.p_min.y as Float - 0.5 - radius.y).ceil() as Int,
        );
        let p1 = Point2i::new(
            (sample_bounds.p_max.x as Float - 0.5 + radius.x).floor() as Int + 1,
            (sample_bounds.p_max.y as Float - 0.5 + radius.y).floor() as Int + 1,
        );
        let tile_pixel_bounds = Bounds2i::new(p0, p1).intersect(&self.bounds());

        FilmTile::new(tile_pixel_bounds, *sample_bounds, radius, Arc::clone(&self.filter_table))
    }

    /// Hand a finished tile back to the film. It becomes visible at the next
    /// `scale_to_pixel()`.
    ///
    /// * `tile` - The tile.
    pub fn merge_film_tile(&self, tile: FilmTile) {
        self.pending_tiles.lock().unwrap_or_else(PoisonError::into_inner).push(tile);
    }

    /// Record that another pass finished. Leader only.
    pub fn incre_sample_count(&self) {
        self.sample_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the number of completed passes.
    pub fn sample_count(&self) -> usize {
        self.sample_count.load(Ordering::Acquire)
    }

    /// Fold the pending tiles into the image, then rebuild the display buffer
    /// from the filter-weighted means and apply the post-process. Pixels
    /// without weight are black. Leader only, after every worker finished the
    /// pass.
    pub fn scale_to_pixel(&self) {
        let mut tiles = std::mem::take(&mut *self.pending_tiles.lock().unwrap_or_else(PoisonError::into_inner));
        tiles.sort_by_key(|tile| {
            let b = tile.get_sample_bounds();
            (b.p_min.y, b.p_min.x, b.p_max.y, b.p_max.x)
        });

        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        for tile in tiles.iter() {
            for p in tile.get_pixel_bounds() {
                let offset = p.y as usize * self.width + p.x as usize;
                pixels[offset].merge(tile.get_pixel(&p));
            }
        }

        let mut image: Vec<Spectrum> = pixels
            .iter()
            .map(|pixel| {
                let l = pixel.resolve();
                Spectrum::from_rgb(max(0.0, l[0]), max(0.0, l[1]), max(0.0, l[2]))
            })
            .collect();
        drop(pixels);

        if let Some(post_process) = &self.post_process {
            post_process.process(self.width, self.height, &mut image);
        }

        self.display.store(Arc::new(image));
    }

    /// Reset accumulators, pending tiles, pass count and display buffer.
    pub fn clear(&self) {
        self.pending_tiles.lock().unwrap_or_else(PoisonError::into_inner).clear();
        for pixel in self.pixels.lock().unwrap_or_else(PoisonError::into_inner).iter_mut() {
            *pixel = PixelEstimate::default();
        }
        self.sample_count.store(0, Ordering::Release);
        self.display.store(Arc::new(vec![Spectrum::ZERO; self.width * self.height]));
    }

    /// Returns a snapshot of the display buffer.
    pub fn frame_buffer(&self) -> Arc<Vec<Spectrum>> {
        self.display.load_full()
    }

    /// Returns the display buffer as gamma corrected 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.display
            .load()
            .iter()
            .flat_map(|s| s.c.iter().map(|&v| clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8))
            .collect()
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the reconstruction filter.
    pub fn filter(&self) -> &ArcFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::*;
    use crate::rng::*;
    use float_cmp::*;
    use proptest::prelude::*;
    use std::thread;

    struct UnitBox(FilterData);

    impl Filter for UnitBox {
        fn get_data(&self) -> &FilterData {
            &self.0
        }

        fn evaluate(&self, _p: &Point2f) -> Float {
            1.0
        }
    }

    struct Tent(FilterData);

    impl Filter for Tent {
        fn get_data(&self) -> &FilterData {
            &self.0
        }

        fn evaluate(&self, p: &Point2f) -> Float {
            max(0.0, self.0.radius.x - abs(p.x)) * max(0.0, self.0.radius.y - abs(p.y))
        }
    }

    /// Gaussian falloff shifted to zero at the radius.
    struct Falloff(FilterData);

    impl Filter for Falloff {
        fn get_data(&self) -> &FilterData {
            &self.0
        }

        fn evaluate(&self, p: &Point2f) -> Float {
            let g = |d: Float, r: Float| max(0.0, (-2.0 * d * d).exp() - (-2.0 * r * r).exp());
            g(p.x, self.0.radius.x) * g(p.y, self.0.radius.y)
        }
    }

    /// Mitchell-Netravali cubic with B = C = 1/3; negative past half radius.
    struct Cubic(FilterData);

    impl Cubic {
        fn mitchell_1d(x: Float) -> Float {
            let (b, c) = (1.0 / 3.0, 1.0 / 3.0);
            let x = abs(2.0 * x);
            if x > 1.0 {
                ((-b - 6.0 * c) * x * x * x + (6.0 * b + 30.0 * c) * x * x + (-12.0 * b - 48.0 * c) * x
                    + (8.0 * b + 24.0 * c))
                    / 6.0
            } else {
                ((12.0 - 9.0 * b - 6.0 * c) * x * x * x + (-18.0 + 12.0 * b + 6.0 * c) * x * x + (6.0 - 2.0 * b))
                    / 6.0
            }
        }
    }

    impl Filter for Cubic {
        fn get_data(&self) -> &FilterData {
            &self.0
        }

        fn evaluate(&self, p: &Point2f) -> Float {
            Self::mitchell_1d(p.x * self.0.inv_radius.x) * Self::mitchell_1d(p.y * self.0.inv_radius.y)
        }
    }

    fn box_film(width: usize, height: usize) -> Film {
        Film::new(width, height, Arc::new(UnitBox(FilterData::new(Vector2f::new(0.5, 0.5)))))
    }

    /// Splat samples through one tile covering the whole image.
    fn add_samples(film: &Film, samples: &[(Float, Float, Spectrum)]) {
        let mut tile = film.get_film_tile(&film.bounds());
        for (x, y, l) in samples.iter() {
            tile.add_sample(&Point2f::new(*x, *y), l);
        }
        film.merge_film_tile(tile);
    }

    /// Render one pass of jittered samples on `n_threads` workers pulling
    /// tiles from a shared queue. Radiance comes from `radiance(x, y)`.
    fn render_pass<F>(film: &Film, pass: usize, n_threads: usize, radiance: F)
    where
        F: Fn(Float, Float) -> Spectrum + Sync,
    {
        let task_sync = TaskSynchronizer::new(4);
        task_sync.init(film.width(), film.height(), n_threads);

        thread::scope(|scope| {
            for _ in 0..n_threads {
                scope.spawn(|| {
                    while let Some(tile) = task_sync.get_next_task() {
                        let mut film_tile = film.get_film_tile(&tile.bounds());
                        for pixel in tile.pixels() {
                            let seed = ((pass as u64) << 32) | (pixel.y as u64 * 1024 + pixel.x as u64);
                            let mut rng = RNG::new(seed);
                            let x = pixel.x as Float + rng.uniform_float();
                            let y = pixel.y as Float + rng.uniform_float();
                            film_tile.add_sample(&Point2f::new(x, y), &radiance(x, y));
                        }
                        film.merge_film_tile(film_tile);
                    }
                });
            }
        });
        film.incre_sample_count();
        film.scale_to_pixel();
    }

    struct Invert;

    impl FilmPostProcess for Invert {
        fn process(&self, _width: usize, _height: usize, image: &mut [Spectrum]) {
            for p in image.iter_mut() {
                *p = Spectrum::ONE - *p;
            }
        }
    }

    #[test]
    fn box_filter_averages_pixel_samples() {
        let film = box_film(2, 2);
        add_samples(
            &film,
            &[
                (0.25, 0.25, Spectrum::new(1.0)),
                (0.75, 0.75, Spectrum::new(3.0)),
                (1.5, 1.5, Spectrum::from_rgb(0.5, 0.25, 0.125)),
            ],
        );
        film.incre_sample_count();
        film.scale_to_pixel();

        let fb = film.frame_buffer();
        assert_eq!(fb[0], Spectrum::new(2.0));
        assert_eq!(fb[3], Spectrum::from_rgb(0.5, 0.25, 0.125));
        assert_eq!(fb[1], Spectrum::ZERO);
        assert_eq!(film.sample_count(), 1);
    }

    #[test]
    fn wide_filter_splats_to_neighbours() {
        let film = Film::new(5, 5, Arc::new(Tent(FilterData::new(Vector2f::new(1.5, 1.5)))));
        add_samples(&film, &[(2.5, 2.5, Spectrum::new(1.0))]);
        film.scale_to_pixel();

        let fb = film.frame_buffer();
        for (i, p) in fb.iter().enumerate() {
            let (x, y) = (i % 5, i / 5);
            let near = (1..=3).contains(&x) && (1..=3).contains(&y);
            assert_eq!(p.is_black(), !near, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn film_tile_covers_filter_footprint_of_render_tile() {
        let film = Film::new(16, 16, Arc::new(Tent(FilterData::new(Vector2f::new(1.5, 1.5)))));
        let tile = film.get_film_tile(&Bounds2i::new(Point2i::new(4, 4), Point2i::new(8, 8)));
        assert_eq!(tile.get_pixel_bounds(), Bounds2i::new(Point2i::new(2, 2), Point2i::new(10, 10)));

        let corner = film.get_film_tile(&Bounds2i::new(Point2i::new(0, 0), Point2i::new(4, 4)));
        assert_eq!(corner.get_pixel_bounds(), Bounds2i::new(Point2i::new(0, 0), Point2i::new(6, 6)));
        assert_eq!(corner.get_sample_bounds(), Bounds2i::new(Point2i::new(0, 0), Point2i::new(4, 4)));
    }

    #[test]
    fn samples_outside_image_are_clipped() {
        let film = box_film(3, 3);
        add_samples(
            &film,
            &[(-0.4, 1.5, Spectrum::new(1.0)), (3.9, 3.9, Spectrum::new(1.0))],
        );
        film.scale_to_pixel();
        assert!(film.frame_buffer().iter().all(|p| p.is_black()));
    }

    #[test]
    fn clear_resets_everything() {
        let film = box_film(2, 1);
        add_samples(&film, &[(0.5, 0.5, Spectrum::new(4.0))]);
        film.incre_sample_count();
        film.scale_to_pixel();
        let before = film.frame_buffer();

        // Tiles of an abandoned pass are dropped too.
        add_samples(&film, &[(0.5, 0.5, Spectrum::new(9.0))]);
        film.clear();
        assert_eq!(film.sample_count(), 0);
        assert!(film.frame_buffer().iter().all(|p| p.is_black()));
        // Earlier snapshots are not affected.
        assert_eq!(before[0], Spectrum::new(4.0));

        add_samples(&film, &[(0.5, 0.5, Spectrum::new(1.0))]);
        film.scale_to_pixel();
        assert_eq!(film.frame_buffer()[0], Spectrum::new(1.0));
    }

    #[test]
    fn tiles_stay_invisible_until_scaled() {
        let film = box_film(2, 2);
        add_samples(&film, &[(0.5, 0.5, Spectrum::new(1.0))]);
        assert!(film.frame_buffer()[0].is_black());
        film.scale_to_pixel();
        assert_eq!(film.frame_buffer()[0], Spectrum::new(1.0));
    }

    #[test]
    fn post_process_runs_at_scale_point() {
        let film = box_film(1, 1).with_post_process(Some(Arc::new(Invert)));
        add_samples(&film, &[(0.5, 0.5, Spectrum::new(0.25))]);
        film.scale_to_pixel();
        assert_eq!(film.frame_buffer()[0], Spectrum::new(0.75));
        assert!(film.resized(2, 2).post_process.is_some());
    }

    #[test]
    fn to_rgb8_applies_gamma() {
        let film = box_film(2, 1);
        add_samples(
            &film,
            &[(0.5, 0.5, Spectrum::new(1.0)), (1.5, 0.5, Spectrum::new(0.0))],
        );
        film.scale_to_pixel();
        assert_eq!(film.to_rgb8(), vec![255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn constant_radiance_is_exact_with_smooth_filters() {
        let c = Spectrum::from_rgb(0.7, 0.3, 0.123);
        let filters: Vec<ArcFilter> = vec![
            Arc::new(Falloff(FilterData::new(Vector2f::new(1.5, 1.5)))),
            Arc::new(Cubic(FilterData::new(Vector2f::new(2.0, 2.0)))),
            Arc::new(Tent(FilterData::new(Vector2f::new(2.0, 2.0)))),
        ];
        for filter in filters {
            let film = Film::new(13, 9, filter);
            for pass in 0..3 {
                render_pass(&film, pass, 4, |_, _| c);
                for (i, p) in film.frame_buffer().iter().enumerate() {
                    assert_eq!(*p, c, "pixel {} after pass {}", i, pass);
                }
            }
        }
    }

    #[test]
    fn parallel_splats_are_reproducible() {
        let radiance = |x: Float, y: Float| Spectrum::from_rgb(x * 0.1, y * 0.2, (x * y).sin().abs());
        let filter: ArcFilter = Arc::new(Cubic(FilterData::new(Vector2f::new(2.0, 2.0))));

        let serial = Film::new(17, 11, Arc::clone(&filter));
        let parallel = Film::new(17, 11, Arc::clone(&filter));
        let parallel_again = Film::new(17, 11, filter);
        for pass in 0..2 {
            render_pass(&serial, pass, 1, radiance);
            render_pass(&parallel, pass, 8, radiance);
            render_pass(&parallel_again, pass, 8, radiance);
        }

        assert_eq!(*serial.frame_buffer(), *parallel.frame_buffer());
        assert_eq!(*parallel.frame_buffer(), *parallel_again.frame_buffer());
        assert!(serial.frame_buffer().iter().any(|p| !p.is_black()));
    }

    proptest! {
        #[test]
        fn accumulation_is_order_independent(
            samples in prop::collection::vec((0.0f32..4.0, 0.0f32..4.0, 0.0f32..10.0), 1..40)
        ) {
            let filter: ArcFilter = Arc::new(Tent(FilterData::new(Vector2f::new(1.0, 1.0))));
            let forward = Film::new(4, 4, Arc::clone(&filter));
            let backward = Film::new(4, 4, filter);

            let samples: Vec<(Float, Float, Spectrum)> =
                samples.iter().map(|(x, y, v)| (*x, *y, Spectrum::new(*v))).collect();
            let reversed: Vec<(Float, Float, Spectrum)> = samples.iter().rev().copied().collect();
            add_samples(&forward, &samples);
            add_samples(&backward, &reversed);
            forward.scale_to_pixel();
            backward.scale_to_pixel();

            for (a, b) in forward.frame_buffer().iter().zip(backward.frame_buffer().iter()) {
                prop_assert!(approx_eq!(f32, a[0], b[0], epsilon = 1e-3, ulps = 8));
            }
        }
    }
}
