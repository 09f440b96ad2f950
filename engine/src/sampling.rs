//! Common sampling functions.

use crate::base::*;
use crate::geometry::*;
use crate::rng::*;

/// Fill `samples` with 1D stratified samples, one per stratum.
///
/// * `rng`     - Random number generator.
/// * `samples` - The samples to fill; its length is the number of strata.
/// * `jitter`  - Jitter the samples.
pub fn stratified_sample_1d(rng: &mut RNG, samples: &mut [Float], jitter: bool) {
    let inv_n_samples = 1.0 / samples.len() as Float;
    for (i, s) in samples.iter_mut().enumerate() {
        let delta = if jitter { rng.uniform_float() } else { 0.5 };
        *s = min((i as Float + delta) * inv_n_samples, ONE_MINUS_EPSILON);
    }
}

/// Fill `samples` with 2D stratified samples in row-major stratum order.
///
/// * `rng`     - Random number generator.
/// * `samples` - The samples to fill; must hold `nx * ny` points.
/// * `nx`      - Number of samples in x-direction.
/// * `ny`      - Number of samples in y-direction.
/// * `jitter`  - Jitter the samples.
pub fn stratified_sample_2d(rng: &mut RNG, samples: &mut [Point2f], nx: usize, ny: usize, jitter: bool) {
    debug_assert_eq!(samples.len(), nx * ny);

    let dx = 1.0 / nx as Float;
    let dy = 1.0 / ny as Float;
    for (i, s) in samples.iter_mut().enumerate() {
        let (x, y) = (i % nx, i / nx);
        let jx = if jitter { rng.uniform_float() } else { 0.5 };
        let jy = if jitter { rng.uniform_float() } else { 0.5 };
        *s = Point2f::new(
            min((x as Float + jx) * dx, ONE_MINUS_EPSILON),
            min((y as Float + jy) * dy, ONE_MINUS_EPSILON),
        );
    }
}

/// Fill `samples` with 2D Latin Hypercube samples.
///
/// * `rng`     - Random number generator.
/// * `samples` - The samples to fill.
pub fn latin_hypercube(rng: &mut RNG, samples: &mut [Point2f]) {
    let n_samples = samples.len();
    let inv_n_samples = 1.0 / n_samples as Float;

    // Generate LHS samples along diagonal.
    for (i, s) in samples.iter_mut().enumerate() {
        let sx = (i as Float + rng.uniform_float()) * inv_n_samples;
        let sy = (i as Float + rng.uniform_float()) * inv_n_samples;
        *s = Point2f::new(min(sx, ONE_MINUS_EPSILON), min(sy, ONE_MINUS_EPSILON));
    }

    // Permute LHS samples in each dimension.
    for j in 0..n_samples {
        let other = j + rng.bounded_uniform_u32(0, (n_samples - j) as u32) as usize;
        let t = samples[j].x;
        samples[j].x = samples[other].x;
        samples[other].x = t;
    }
    for j in 0..n_samples {
        let other = j + rng.bounded_uniform_u32(0, (n_samples - j) as u32) as usize;
        let t = samples[j].y;
        samples[j].y = samples[other].y;
        samples[other].y = t;
    }
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = 2.0 * *u - Vector2f::new(1.0, 1.0);

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(u_offset.x) > abs(u_offset.y) {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y))
    };

    r * Point2f::new(theta.cos(), theta.sin())
}

/// Uniformly sample a direction on the hemisphere about +z.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z = u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a hemisphere.
#[inline]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Sample a direction on the hemisphere about +z using cosine-weighted
/// sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn stratified_2d_places_one_sample_per_stratum() {
        let mut rng = RNG::new(3);
        let mut samples = [Point2f::zero(); 6];
        stratified_sample_2d(&mut rng, &mut samples, 3, 2, true);
        for (i, s) in samples.iter().enumerate() {
            let (x, y) = (i % 3, i / 3);
            assert!((s.x * 3.0) as usize == x);
            assert!((s.y * 2.0) as usize == y);
        }
    }

    #[test]
    fn latin_hypercube_has_one_sample_per_row_in_each_dimension() {
        let mut rng = RNG::new(11);
        let n = 8;
        let mut samples = vec![Point2f::zero(); n];
        latin_hypercube(&mut rng, &mut samples);
        for dim in 0..2 {
            let mut rows: Vec<usize> = samples.iter().map(|p| (p[dim] * n as Float) as usize).collect();
            rows.sort_unstable();
            assert_eq!(rows, (0..n).collect::<Vec<usize>>());
        }
    }

    #[test]
    fn stratified_1d_fills_the_given_slice_in_place() {
        let mut rng = RNG::new(7);
        let mut samples = [2.0; 4];
        stratified_sample_1d(&mut rng, &mut samples, false);
        assert_eq!(samples, [0.125, 0.375, 0.625, 0.875]);
    }

    proptest! {
        #[test]
        fn concentric_disk_samples_are_inside_unit_disk(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let p = concentric_sample_disk(&Point2f::new(x, y));
            prop_assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cosine_hemisphere_samples_are_unit_and_above_plane(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let w = cosine_sample_hemisphere(&Point2f::new(x, y));
            prop_assert!(w.z >= 0.0);
            prop_assert!((w.length() - 1.0).abs() < 1e-4);
        }
    }
}
