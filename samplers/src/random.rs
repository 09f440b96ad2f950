//! Random Sampler.

use engine::geometry::*;
use engine::rng::*;
use engine::sampler::*;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
#[derive(Copy, Clone, Debug, Default)]
pub struct RandomSampler;

impl RandomSampler {
    /// Create a new `RandomSampler`.
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for RandomSampler {
    /// Fill the sample buffer with uniform random values.
    ///
    /// * `_pass`  - The sampling pass.
    /// * `_pixel` - The pixel being sampled.
    /// * `sample` - The sample buffer to fill.
    /// * `rng`    - The worker's random number generator.
    fn generate_samples(&self, _pass: usize, _pixel: &Point2i, sample: &mut SampleBuffer, rng: &mut RNG) {
        sample.camera = CameraSample::new(
            Point2f::new(rng.uniform_float(), rng.uniform_float()),
            Point2f::new(rng.uniform_float(), rng.uniform_float()),
            rng.uniform_float(),
        );

        for array in sample.array_1d.iter_mut() {
            for v in array.iter_mut() {
                *v = rng.uniform_float();
            }
        }

        for array in sample.array_2d.iter_mut() {
            for v in array.iter_mut() {
                *v = Point2f::new(rng.uniform_float(), rng.uniform_float());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_requested_dimension() {
        let mut sample = SampleBuffer::new();
        let a = sample.request_1d_array(5);
        let b = sample.request_2d_array(3);
        let mut rng = RNG::new(1);

        RandomSampler::new().generate_samples(0, &Point2i::new(3, 4), &mut sample, &mut rng);

        let c = sample.camera;
        for v in [c.p_film.x, c.p_film.y, c.p_lens.x, c.p_lens.y, c.time] {
            assert!((0.0..1.0).contains(&v));
        }
        assert!(sample.get_1d_array(a).iter().all(|v| (0.0..1.0).contains(v)));
        assert!(sample.get_1d_array(a).iter().any(|&v| v != 0.0));
        assert!(sample.get_2d_array(b).iter().all(|p| (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y)));
    }
}
