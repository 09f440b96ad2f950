//! Spheres

use engine::base::*;
use engine::geometry::*;
use engine::scene::*;
use engine::spectrum::*;

/// A diffuse, optionally emissive sphere.
#[derive(Copy, Clone, Debug)]
pub struct Sphere {
    /// Center in world space.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,

    /// Diffuse reflectance.
    pub albedo: Spectrum,

    /// Emitted radiance.
    pub emission: Spectrum,
}

impl Sphere {
    /// Create a new non-emissive sphere.
    ///
    /// * `center` - Center in world space.
    /// * `radius` - Radius of sphere.
    /// * `albedo` - Diffuse reflectance.
    pub fn new(center: Point3f, radius: Float, albedo: Spectrum) -> Self {
        Self {
            center,
            radius,
            albedo,
            emission: Spectrum::ZERO,
        }
    }

    /// Make the sphere emit light.
    ///
    /// * `emission` - Emitted radiance.
    pub fn with_emission(mut self, emission: Spectrum) -> Self {
        self.emission = emission;
        self
    }

    /// Returns the world space bounding box.
    pub fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Returns the parametric distance of the nearest intersection within the
    /// ray's extent.
    ///
    /// * `ray` - The ray.
    fn hit_t(&self, ray: &Ray) -> Option<Float> {
        // Compute quadratic sphere coefficients.
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * ray.d.dot(&oc);
        let c = oc.length_squared() - self.radius * self.radius;

        // Solve quadratic equation for t values.
        let (t0, t1) = solve_quadratic(a, b, c)?;

        // Check t0 and t1 for nearest intersection.
        if t0 > ray.t_max || t1 <= ray.t_min {
            return None;
        }
        let t = if t0 > ray.t_min { t0 } else { t1 };
        if t > ray.t_max {
            None
        } else {
            Some(t)
        }
    }

    /// Returns the nearest intersection with the sphere.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let t = self.hit_t(ray)?;
        let p = ray.at(t);
        Some(SurfaceHit {
            t,
            p,
            n: (p - self.center) / self.radius,
            albedo: self.albedo,
            emission: self.emission,
        })
    }

    /// Returns true if the ray hits the sphere.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.hit_t(ray).is_some()
    }
}

/// Solve `a t^2 + b t + c = 0` and return the roots in ascending order.
///
/// * `a` - Quadratic coefficient.
/// * `b` - Linear coefficient.
/// * `c` - Constant.
pub fn solve_quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    // Find quadratic discriminant in double precision.
    let (a, b, c) = (a as f64, b as f64, c as f64);
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    // Compute quadratic t values.
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    let mut t0 = q / a;
    let mut t1 = if q != 0.0 { c / q } else { t0 };
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    Some((t0 as Float, t1 as Float))
}
