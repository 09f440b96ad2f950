//! Estimator

use crate::geometry::*;
use crate::memory::*;
use crate::rng::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Light transport estimator interface. The render loop only ever calls
/// `request_samples()` once during setup and then `li()` per pixel sample
/// from every worker concurrently.
pub trait Estimator {
    /// Declare the auxiliary sample arrays the estimator needs by calling
    /// `request_1d_array()`/`request_2d_array()` on the template buffer and
    /// remembering the returned indices.
    ///
    /// * `scene`  - The scene.
    /// * `sample` - The template sample buffer cloned to every worker.
    fn request_samples(&mut self, _scene: &dyn Scene, _sample: &mut SampleBuffer) {}

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`    - The camera ray with differentials.
    /// * `scene`  - The scene.
    /// * `sample` - The sample buffer for this pixel sample.
    /// * `rng`    - The worker's random number generator.
    /// * `arena`  - Scratch memory reset after this pixel sample.
    fn li(&self, ray: &Ray, scene: &dyn Scene, sample: &SampleBuffer, rng: &mut RNG, arena: &MemoryArena) -> Spectrum;
}

/// Enumerated estimator kinds selectable in a render job.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EstimatorType {
    Constant,
    Normals,
    AmbientOcclusion,
    Path,
}

impl Default for EstimatorType {
    fn default() -> Self {
        EstimatorType::Path
    }
}

/// Atomic reference counted `Estimator`.
pub type ArcEstimator = Arc<dyn Estimator + Send + Sync>;
