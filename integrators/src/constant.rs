//! Constant Estimator

use engine::estimator::*;
use engine::geometry::*;
use engine::memory::*;
use engine::rng::*;
use engine::sampler::*;
use engine::scene::*;
use engine::spectrum::*;

/// Returns the same radiance for every ray. Useful for checking that the
/// film reconstruction is unbiased.
#[derive(Copy, Clone, Debug)]
pub struct ConstantEstimator {
    /// The radiance returned.
    value: Spectrum,
}

impl ConstantEstimator {
    /// Create a new `ConstantEstimator`.
    ///
    /// * `value` - The radiance returned for every ray.
    pub fn new(value: Spectrum) -> Self {
        Self { value }
    }
}

impl Default for ConstantEstimator {
    fn default() -> Self {
        Self::new(Spectrum::ONE)
    }
}

impl Estimator for ConstantEstimator {
    fn li(&self, _ray: &Ray, _scene: &dyn Scene, _sample: &SampleBuffer, _rng: &mut RNG, _arena: &MemoryArena) -> Spectrum {
        self.value
    }
}
