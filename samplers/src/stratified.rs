//! Stratified Sampler.

use engine::base::*;
use engine::geometry::*;
use engine::rng::*;
use engine::sampler::*;
use engine::sampling::*;

/// Implements a stratified sampler for progressive rendering. The pixel and
/// lens domains are split into a `strata x strata` grid and each pass visits
/// one stratum, so `strata^2` consecutive passes cover every stratum of a
/// pixel exactly once. The visiting order is offset per pixel to avoid
/// structured aliasing between neighbouring pixels.
#[derive(Copy, Clone, Debug)]
pub struct StratifiedSampler {
    /// Number of strata along each axis.
    strata: usize,

    /// Indicates whether or not to jitter each sample's center point.
    /// In unjittered mode is is uniform sampling and is not useful for
    /// high quality rendering but mostly for comparing sampling techniques.
    jitter_samples: bool,
}

impl StratifiedSampler {
    /// Create a new `StratifiedSampler` sized for the number of passes.
    ///
    /// * `samples_per_pixel` - Number of passes of the render.
    /// * `jitter_samples`    - Indicates whether or not to jitter each
    ///                         sample's center point.
    pub fn new(samples_per_pixel: usize, jitter_samples: bool) -> Self {
        let strata = max(1, (samples_per_pixel as Float).sqrt().floor() as usize);
        if strata * strata != samples_per_pixel {
            warn!(
                "{} samples per pixel is not a perfect square; using {}x{} strata",
                samples_per_pixel, strata, strata
            );
        }
        Self { strata, jitter_samples }
    }

    /// Returns the number of strata along each axis.
    pub fn strata(&self) -> usize {
        self.strata
    }

    /// Returns a point in the stratum visited in `pass`.
    fn stratum_sample(&self, pass: usize, offset: u64, rng: &mut RNG) -> Point2f {
        let n = self.strata * self.strata;
        let stratum = (pass + (offset % n as u64) as usize) % n;
        let (sx, sy) = (stratum % self.strata, stratum / self.strata);

        let (jx, jy) = if self.jitter_samples {
            (rng.uniform_float(), rng.uniform_float())
        } else {
            (0.5, 0.5)
        };
        let inv_strata = 1.0 / self.strata as Float;
        Point2f::new(
            min((sx as Float + jx) * inv_strata, ONE_MINUS_EPSILON),
            min((sy as Float + jy) * inv_strata, ONE_MINUS_EPSILON),
        )
    }
}

/// Mix pixel coordinates into a well distributed 64-bit value.
fn pixel_hash(p: &Point2i, salt: u64) -> u64 {
    let mut h = (p.x as u32 as u64) | ((p.y as u32 as u64) << 32);
    h ^= salt;
    h = (h ^ (h >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94d049bb133111eb);
    h ^ (h >> 31)
}

impl Sampler for StratifiedSampler {
    /// Fill the sample buffer for one pass.
    ///
    /// * `pass`   - The sampling pass.
    /// * `pixel`  - The pixel being sampled.
    /// * `sample` - The sample buffer to fill.
    /// * `rng`    - The worker's random number generator.
    fn generate_samples(&self, pass: usize, pixel: &Point2i, sample: &mut SampleBuffer, rng: &mut RNG) {
        let p_film = self.stratum_sample(pass, pixel_hash(pixel, 0), rng);
        let p_lens = self.stratum_sample(pass, pixel_hash(pixel, 0x9e3779b97f4a7c15), rng);
        sample.camera = CameraSample::new(p_film, p_lens, rng.uniform_float());

        // Generate arrays of stratified samples for the pixel.
        for array in sample.array_1d.iter_mut() {
            let count = array.len();
            stratified_sample_1d(rng, array, self.jitter_samples);
            rng.shuffle(array, count, 1);
        }

        for array in sample.array_2d.iter_mut() {
            latin_hypercube(rng, array);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn passes_cover_every_stratum(x in 0i32..512, y in 0i32..512, spp_root in 1usize..6) {
            let spp = spp_root * spp_root;
            let sampler = StratifiedSampler::new(spp, true);
            let mut rng = RNG::new(x as u64);
            let mut sample = SampleBuffer::new();
            let pixel = Point2i::new(x, y);

            let mut film_hits = vec![0; spp];
            let mut lens_hits = vec![0; spp];
            for pass in 0..spp {
                sampler.generate_samples(pass, &pixel, &mut sample, &mut rng);
                let stratum = |p: Point2f| {
                    (p.y * spp_root as Float) as usize * spp_root + (p.x * spp_root as Float) as usize
                };
                film_hits[stratum(sample.camera.p_film)] += 1;
                lens_hits[stratum(sample.camera.p_lens)] += 1;
            }
            prop_assert!(film_hits.iter().all(|&h| h == 1));
            prop_assert!(lens_hits.iter().all(|&h| h == 1));
        }
    }

    #[test]
    fn non_square_counts_round_down() {
        assert_eq!(StratifiedSampler::new(10, true).strata(), 3);
        assert_eq!(StratifiedSampler::new(1, true).strata(), 1);
    }

    #[test]
    fn unjittered_samples_sit_at_stratum_centers() {
        let sampler = StratifiedSampler::new(4, false);
        let mut rng = RNG::new(0);
        let mut sample = SampleBuffer::new();
        sampler.generate_samples(0, &Point2i::new(0, 0), &mut sample, &mut rng);
        let p = sample.camera.p_film;
        assert!(p.x == 0.25 || p.x == 0.75);
        assert!(p.y == 0.25 || p.y == 0.75);
    }

    #[test]
    fn arrays_are_stratified() {
        let sampler = StratifiedSampler::new(4, true);
        let mut sample = SampleBuffer::new();
        let a = sample.request_1d_array(8);
        let b = sample.request_2d_array(8);
        let mut rng = RNG::new(5);
        sampler.generate_samples(2, &Point2i::new(9, 1), &mut sample, &mut rng);

        let mut strata: Vec<usize> = sample.get_1d_array(a).iter().map(|v| (v * 8.0) as usize).collect();
        strata.sort_unstable();
        assert_eq!(strata, (0..8).collect::<Vec<_>>());

        let mut rows: Vec<usize> = sample.get_2d_array(b).iter().map(|p| (p.y * 8.0) as usize).collect();
        rows.sort_unstable();
        assert_eq!(rows, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn arrays_are_filled_without_reallocating() {
        let sampler = StratifiedSampler::new(4, true);
        let mut sample = SampleBuffer::new();
        let a = sample.request_1d_array(16);
        let b = sample.request_2d_array(16);
        let p1 = sample.get_1d_array(a).as_ptr();
        let p2 = sample.get_2d_array(b).as_ptr();

        let mut rng = RNG::new(3);
        for pass in 0..4 {
            sampler.generate_samples(pass, &Point2i::new(2, 7), &mut sample, &mut rng);
            assert_eq!(sample.get_1d_array(a).as_ptr(), p1);
            assert_eq!(sample.get_2d_array(b).as_ptr(), p2);
            assert_eq!(sample.get_1d_array(a).len(), 16);
        }
    }
}
