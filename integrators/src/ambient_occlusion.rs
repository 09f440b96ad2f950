//! Ambient Occlusion Estimator

use crate::common::*;
use engine::base::*;
use engine::estimator::*;
use engine::geometry::*;
use engine::memory::*;
use engine::rng::*;
use engine::sampler::*;
use engine::scene::*;
use engine::spectrum::*;

/// Estimates the fraction of the cosine weighted hemisphere above a hit
/// point that is not blocked within `max_distance`.
#[derive(Clone, Debug)]
pub struct AmbientOcclusionEstimator {
    /// Number of occlusion rays per camera ray.
    n_samples: usize,

    /// Occluders further than this are ignored.
    max_distance: Float,

    /// Index of the requested 2D sample array.
    array_index: Option<usize>,
}

impl AmbientOcclusionEstimator {
    /// Create a new `AmbientOcclusionEstimator`.
    ///
    /// * `n_samples`    - Number of occlusion rays per camera ray.
    /// * `max_distance` - Occluders further than this are ignored.
    pub fn new(n_samples: usize, max_distance: Float) -> Self {
        Self {
            n_samples: n_samples.max(1),
            max_distance,
            array_index: None,
        }
    }
}

impl Default for AmbientOcclusionEstimator {
    fn default() -> Self {
        Self::new(16, INFINITY)
    }
}

impl Estimator for AmbientOcclusionEstimator {
    fn request_samples(&mut self, _scene: &dyn Scene, sample: &mut SampleBuffer) {
        self.array_index = Some(sample.request_2d_array(self.n_samples));
    }

    fn li(&self, ray: &Ray, scene: &dyn Scene, sample: &SampleBuffer, rng: &mut RNG, arena: &MemoryArena) -> Spectrum {
        let hit = match scene.intersect(ray) {
            Some(hit) => hit,
            None => return scene.background(ray),
        };

        // Shade the side of the surface facing the viewer.
        let n = face_forward(&hit.n, &-ray.d);
        let us = self.array_index.map_or(&[][..], |i| sample.get_2d_array(i));
        let directions = arena.alloc_slice_fill_with(self.n_samples, |i| {
            cosine_sample_about(&n, &sample_2d_or_random(us, i, rng))
        });

        let unoccluded = directions
            .iter()
            .filter(|wi| {
                let mut r = spawn_ray(&hit.p, &n, wi);
                r.t_max = self.max_distance;
                !scene.intersect_p(&r)
            })
            .count();

        Spectrum::new(unoccluded as Float / self.n_samples as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapes::*;

    fn run(scene: &SphereScene, ray: &Ray) -> Spectrum {
        let mut estimator = AmbientOcclusionEstimator::new(8, INFINITY);
        let mut sample = SampleBuffer::new();
        estimator.request_samples(scene, &mut sample);
        assert_eq!(sample.array_2d.len(), 1);
        assert_eq!(sample.get_2d_array(0).len(), 8);

        let mut rng = RNG::new(11);
        for u in sample.array_2d[0].iter_mut() {
            *u = Point2f::new(rng.uniform_float(), rng.uniform_float());
        }
        let arena = MemoryArena::default();
        estimator.li(ray, scene, &sample, &mut rng, &arena)
    }

    fn camera_ray() -> Ray {
        Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY)
    }

    #[test]
    fn isolated_sphere_is_unoccluded() {
        let mut scene = SphereScene::new(
            vec![Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, Spectrum::ONE)],
            Spectrum::ZERO,
        );
        scene.build_accelerator();
        assert_eq!(run(&scene, &camera_ray()), Spectrum::ONE);
    }

    #[test]
    fn enclosed_point_is_fully_occluded() {
        // Small sphere inside a large one; the camera sits inside too.
        let mut scene = SphereScene::new(
            vec![
                Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, Spectrum::ONE),
                Sphere::new(Point3f::new(0.0, 0.0, 0.0), 100.0, Spectrum::ONE),
            ],
            Spectrum::ZERO,
        );
        scene.build_accelerator();
        assert_eq!(run(&scene, &camera_ray()), Spectrum::ZERO);
    }

    #[test]
    fn miss_returns_background() {
        let scene = SphereScene::new(vec![], Spectrum::new(0.4));
        assert_eq!(run(&scene, &camera_ray()), Spectrum::new(0.4));
    }
}
