//! Normals Estimator

use engine::estimator::*;
use engine::geometry::*;
use engine::memory::*;
use engine::rng::*;
use engine::sampler::*;
use engine::scene::*;
use engine::spectrum::*;

/// Visualizes surface normals mapped from `[-1, 1]` to `[0, 1]`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NormalsEstimator;

impl NormalsEstimator {
    /// Create a new `NormalsEstimator`.
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for NormalsEstimator {
    fn li(&self, ray: &Ray, scene: &dyn Scene, _sample: &SampleBuffer, _rng: &mut RNG, _arena: &MemoryArena) -> Spectrum {
        match scene.intersect(ray) {
            Some(hit) => Spectrum::from_rgb(hit.n.x * 0.5 + 0.5, hit.n.y * 0.5 + 0.5, hit.n.z * 0.5 + 0.5),
            None => scene.background(ray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::base::*;
    use shapes::*;

    #[test]
    fn maps_normal_to_colour() {
        let mut scene = SphereScene::new(
            vec![Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, Spectrum::ONE)],
            Spectrum::new(0.3),
        );
        scene.build_accelerator();
        let estimator = NormalsEstimator::new();
        let arena = MemoryArena::default();
        let mut rng = RNG::new(0);
        let sample = SampleBuffer::new();

        let hit = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY);
        let l = estimator.li(&hit, &scene, &sample, &mut rng, &arena);
        assert_eq!(l, Spectrum::from_rgb(0.5, 0.5, 0.0));

        let miss = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, -1.0), 0.0, INFINITY);
        let l = estimator.li(&miss, &scene, &sample, &mut rng, &arena);
        assert_eq!(l, Spectrum::new(0.3));
    }
}
