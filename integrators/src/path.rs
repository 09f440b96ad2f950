//! Path Integrator

use crate::common::*;
use engine::base::*;
use engine::estimator::*;
use engine::geometry::*;
use engine::memory::*;
use engine::rng::*;
use engine::sampler::*;
use engine::scene::*;
use engine::spectrum::*;

/// Bounce after which Russian roulette may terminate the path.
pub const RUSSIAN_ROULETTE_DEPTH: usize = 3;

/// Unidirectional path tracer over diffuse emissive surfaces. Escaping rays
/// pick up the scene background.
#[derive(Clone, Debug)]
pub struct PathEstimator {
    /// Maximum number of bounces.
    max_depth: usize,

    /// Index of the requested 2D sample array, one sample per bounce.
    array_index: Option<usize>,
}

impl PathEstimator {
    /// Create a new `PathEstimator`.
    ///
    /// * `max_depth` - Maximum number of bounces.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            array_index: None,
        }
    }

    /// Returns the maximum number of bounces.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Estimator for PathEstimator {
    fn request_samples(&mut self, _scene: &dyn Scene, sample: &mut SampleBuffer) {
        if self.max_depth > 0 {
            self.array_index = Some(sample.request_2d_array(self.max_depth));
        }
    }

    fn li(&self, ray: &Ray, scene: &dyn Scene, sample: &SampleBuffer, rng: &mut RNG, _arena: &MemoryArena) -> Spectrum {
        let us = self.array_index.map_or(&[][..], |i| sample.get_2d_array(i));

        let mut l = Spectrum::ZERO;
        let mut beta = Spectrum::ONE;
        let mut ray = *ray;

        let mut bounces = 0_usize;
        loop {
            // Find closest ray intersection or return background radiance.
            let hit = match scene.intersect(&ray) {
                Some(hit) => hit,
                None => {
                    l += beta * scene.background(&ray);
                    break;
                }
            };

            l += beta * hit.emission;

            // Terminate path if `max_depth` was reached.
            if bounces >= self.max_depth {
                break;
            }

            // Lambertian BRDF with cosine sampling: f * cos / pdf = albedo.
            let n = face_forward(&hit.n, &-ray.d);
            let wi = cosine_sample_about(&n, &sample_2d_or_random(us, bounces, rng));
            beta = beta * hit.albedo;
            if beta.is_black() {
                break;
            }

            // Possibly terminate the path with Russian roulette.
            if bounces >= RUSSIAN_ROULETTE_DEPTH {
                let q = max(0.05, 1.0 - beta.y());
                if rng.uniform_float() < q {
                    break;
                }
                beta = beta / (1.0 - q);
            }

            ray = spawn_ray(&hit.p, &n, &wi);
            bounces += 1;
        }

        trace!("Path terminated after {bounces} bounces, L = {l}");
        l
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use shapes::*;

    fn camera_ray() -> Ray {
        Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY)
    }

    fn trace(estimator: &mut PathEstimator, scene: &SphereScene) -> Spectrum {
        let mut sample = SampleBuffer::new();
        estimator.request_samples(scene, &mut sample);
        let mut rng = RNG::new(5);
        let arena = MemoryArena::default();
        estimator.li(&camera_ray(), scene, &sample, &mut rng, &arena)
    }

    #[test]
    fn requests_one_sample_per_bounce() {
        let mut estimator = PathEstimator::new(5);
        let mut sample = SampleBuffer::new();
        estimator.request_samples(&SphereScene::new(vec![], Spectrum::ZERO), &mut sample);
        assert_eq!(sample.get_2d_array(0).len(), 5);
    }

    #[test]
    fn escaping_ray_sees_background() {
        let scene = SphereScene::new(vec![], Spectrum::new(0.7));
        assert_eq!(trace(&mut PathEstimator::new(5), &scene), Spectrum::new(0.7));
    }

    #[test]
    fn zero_depth_sees_only_emission() {
        let mut scene = SphereScene::new(
            vec![Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, Spectrum::ONE).with_emission(Spectrum::new(2.0))],
            Spectrum::new(10.0),
        );
        scene.build_accelerator();
        assert_eq!(trace(&mut PathEstimator::new(0), &scene), Spectrum::new(2.0));
    }

    #[test]
    fn one_bounce_off_isolated_sphere_reflects_background() {
        // Every bounce off a convex sphere escapes, so L = emission + albedo * background.
        let mut scene = SphereScene::new(
            vec![Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, Spectrum::new(0.5)).with_emission(Spectrum::new(0.1))],
            Spectrum::ONE,
        );
        scene.build_accelerator();
        let l = trace(&mut PathEstimator::new(3), &scene);
        assert!(approx_eq!(f32, l.c[0], 0.6, epsilon = 1e-6));
        assert!(approx_eq!(f32, l.c[1], 0.6, epsilon = 1e-6));
    }

    #[test]
    fn black_surface_ends_path() {
        let mut scene = SphereScene::new(
            vec![Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, Spectrum::ZERO)],
            Spectrum::ONE,
        );
        scene.build_accelerator();
        assert_eq!(trace(&mut PathEstimator::new(5), &scene), Spectrum::ZERO);
    }
}
