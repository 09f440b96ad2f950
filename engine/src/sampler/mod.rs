//! Sampler

mod sample_buffer;

use crate::geometry::*;
use crate::rng::*;
use std::sync::Arc;

// Re-export
pub use sample_buffer::*;

/// Sampler interface. A sampler is stateless with respect to rendering; all
/// per-thread randomness comes from the worker's `RNG` so a single instance
/// is shared by every worker.
pub trait Sampler {
    /// Fill the sample buffer for one pixel sample. The film offset is left
    /// relative to the pixel in [0, 1)^2.
    ///
    /// * `pass`   - The sampling pass (0-based); one sample per pixel per pass.
    /// * `pixel`  - The pixel being sampled.
    /// * `sample` - The sample buffer to fill, including requested arrays.
    /// * `rng`    - The worker's random number generator.
    fn generate_samples(&self, pass: usize, pixel: &Point2i, sample: &mut SampleBuffer, rng: &mut RNG);

    /// Returns the sample count the sampler would prefer for an array
    /// request of `n` (e.g. a perfect square). Default returns `n`.
    ///
    /// * `n` - The requested count.
    fn round_count(&self, n: usize) -> usize {
        n
    }
}

/// Enumerated sampler kinds selectable in a render job.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SamplerType {
    Random,
    Stratified,
}

impl Default for SamplerType {
    fn default() -> Self {
        SamplerType::Stratified
    }
}

/// Atomic reference counted `Sampler`.
pub type ArcSampler = Arc<dyn Sampler + Send + Sync>;
