//! Sphere Scene

use crate::bvh::*;
use crate::sphere::*;
use engine::base::*;
use engine::geometry::*;
use engine::scene::*;
use engine::spectrum::*;

/// A scene made of spheres lit by a sky gradient.
#[derive(Clone, Debug)]
pub struct SphereScene {
    /// The spheres.
    spheres: Vec<Sphere>,

    /// Radiance of escaping rays travelling horizontally.
    horizon: Spectrum,

    /// Radiance of escaping rays travelling straight up.
    zenith: Spectrum,

    /// Acceleration structure. `None` until `build_accelerator()` is called.
    bvh: Option<BVH>,
}

impl SphereScene {
    /// Create a new scene with a uniform background.
    ///
    /// * `spheres`    - The spheres.
    /// * `background` - Radiance of escaping rays.
    pub fn new(spheres: Vec<Sphere>, background: Spectrum) -> Self {
        Self {
            spheres,
            horizon: background,
            zenith: background,
            bvh: None,
        }
    }

    /// Replace the background with a vertical gradient.
    ///
    /// * `horizon` - Radiance at the horizon and below.
    /// * `zenith`  - Radiance straight up.
    pub fn with_sky(mut self, horizon: Spectrum, zenith: Spectrum) -> Self {
        self.horizon = horizon;
        self.zenith = zenith;
        self
    }

    /// Add a sphere. Invalidates the acceleration structure.
    ///
    /// * `sphere` - The sphere.
    pub fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
        self.bvh = None;
    }

    /// Returns the spheres.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Returns true if the acceleration structure has been built.
    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }
}

impl Scene for SphereScene {
    fn build_accelerator(&mut self) {
        let bounds: Vec<Bounds3f> = self.spheres.iter().map(|s| s.world_bound()).collect();
        self.bvh = Some(BVH::new(&bounds));
        info!("Built accelerator for {} spheres", self.spheres.len());
    }

    fn world_bound(&self) -> Bounds3f {
        match &self.bvh {
            Some(bvh) => bvh.world_bound(),
            None => self
                .spheres
                .iter()
                .fold(Bounds3f::EMPTY, |b, s| b.union(&s.world_bound())),
        }
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut closest: Option<SurfaceHit> = None;
        match &self.bvh {
            Some(bvh) => bvh.traverse(ray, |i, r| match self.spheres[i].intersect(r) {
                Some(hit) => {
                    closest = Some(hit);
                    Visit::Hit(hit.t)
                }
                None => Visit::Miss,
            }),
            None => {
                let mut r = *ray;
                for sphere in self.spheres.iter() {
                    if let Some(hit) = sphere.intersect(&r) {
                        r.t_max = hit.t;
                        closest = Some(hit);
                    }
                }
            }
        }
        closest
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        match &self.bvh {
            Some(bvh) => {
                let mut occluded = false;
                bvh.traverse(ray, |i, r| {
                    if self.spheres[i].intersect_p(r) {
                        occluded = true;
                        Visit::Stop
                    } else {
                        Visit::Miss
                    }
                });
                occluded
            }
            None => self.spheres.iter().any(|s| s.intersect_p(ray)),
        }
    }

    fn background(&self, ray: &Ray) -> Spectrum {
        let len = ray.d.length();
        if len == 0.0 {
            return self.horizon;
        }
        let t = clamp(ray.d.y / len, 0.0, 1.0);
        self.horizon * (1.0 - t) + self.zenith * t
    }
}
