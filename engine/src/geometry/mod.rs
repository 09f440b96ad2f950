//! Geometry

mod bounds2;
mod bounds3;
mod matrix4x4;
mod point2;
mod point3;
mod ray;
mod transform;
mod vector2;
mod vector3;

// Re-export.
pub use bounds2::*;
pub use bounds3::*;
pub use matrix4x4::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use transform::*;
pub use vector2::*;
pub use vector3::*;

/// Returns an orthonormal basis with `v1` as one of the axes. `v1` is assumed
/// to be normalized.
///
/// * `v1` - The first axis.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Flip `v` so it lies in the same hemisphere as `n`.
///
/// * `v` - The vector to flip.
/// * `n` - Reference direction.
pub fn face_forward(v: &Vector3f, n: &Vector3f) -> Vector3f {
    if v.dot(n) < 0.0 {
        -*v
    } else {
        *v
    }
}
