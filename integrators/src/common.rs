//! Common

use engine::base::*;
use engine::geometry::*;
use engine::rng::*;
use engine::sampling::*;

/// Spawn a ray leaving a surface point, offset along the normal to the side
/// the ray travels so it does not re-hit the surface it starts on.
///
/// * `p` - The surface point.
/// * `n` - The surface normal.
/// * `d` - The ray direction.
pub fn spawn_ray(p: &Point3f, n: &Vector3f, d: &Vector3f) -> Ray {
    let offset = face_forward(n, d) * SHADOW_EPSILON;
    Ray::new(*p + offset, *d, 0.0, INFINITY)
}

/// Sample a cosine weighted direction about `n` in world space.
///
/// * `n` - Unit normal the hemisphere is centered on.
/// * `u` - The 2D sample.
pub fn cosine_sample_about(n: &Vector3f, u: &Point2f) -> Vector3f {
    let (s, t) = coordinate_system(n);
    let local = cosine_sample_hemisphere(u);
    s * local.x + t * local.y + *n * local.z
}

/// Returns the sample at `index` from a requested 2D array, or a fresh one
/// from the RNG when the array is shorter than expected.
///
/// * `array` - The requested array.
/// * `index` - Index into the array.
/// * `rng`   - Fallback random number generator.
pub fn sample_2d_or_random(array: &[Point2f], index: usize, rng: &mut RNG) -> Point2f {
    match array.get(index) {
        Some(u) => *u,
        None => Point2f::new(rng.uniform_float(), rng.uniform_float()),
    }
}
