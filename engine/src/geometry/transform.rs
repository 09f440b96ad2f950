//! Transformations

use crate::geometry::*;

/// Represents a 4x4 matrix transformation along with its inverse.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    /// The transformation matrix.
    pub m: Matrix4x4,

    /// The inverse of the transformation matrix.
    pub m_inv: Matrix4x4,
}

impl Transform {
    /// Create a transform from a matrix. Returns `None` for singular matrices.
    ///
    /// * `m` - The matrix.
    pub fn new(m: Matrix4x4) -> Option<Self> {
        m.inverse().map(|m_inv| Self { m, m_inv })
    }

    /// Returns a translation transform.
    ///
    /// * `delta` - Offset.
    pub fn translate(delta: &Vector3f) -> Self {
        let m = Matrix4x4::new([
            [1.0, 0.0, 0.0, delta.x],
            [0.0, 1.0, 0.0, delta.y],
            [0.0, 0.0, 1.0, delta.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let m_inv = Matrix4x4::new([
            [1.0, 0.0, 0.0, -delta.x],
            [0.0, 1.0, 0.0, -delta.y],
            [0.0, 0.0, 1.0, -delta.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv }
    }

    /// Returns the world-to-camera transform of a camera at `pos` looking at
    /// `look` with the given `up` orientation. Camera space is left-handed
    /// with +z along the viewing direction and +y up. Returns `None` when
    /// the viewing direction is degenerate or parallel to `up`.
    ///
    /// * `pos`  - Camera position.
    /// * `look` - Point the camera looks at.
    /// * `up`   - Up vector.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Option<Self> {
        let dir = *look - *pos;
        if dir.length_squared() == 0.0 {
            return None;
        }
        let dir = dir.normalize();

        let right = up.normalize().cross(&dir);
        if right.length() == 0.0 || right.has_nans() {
            return None;
        }
        let right = right.normalize();
        let new_up = dir.cross(&right);

        let camera_to_world = Matrix4x4::new([
            [right.x, new_up.x, dir.x, pos.x],
            [right.y, new_up.y, dir.y, pos.y],
            [right.z, new_up.z, dir.z, pos.z],
            [0.0,     0.0,      0.0,   1.0],
        ]);

        camera_to_world.inverse().map(|m| Self {
            m,
            m_inv: camera_to_world,
        })
    }

    /// Returns the inverse transformation.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Transform a point.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m.m;
        let xp = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let yp = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let zp = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let wp = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if wp == 1.0 {
            Point3f::new(xp, yp, zp)
        } else {
            Point3f::new(xp, yp, zp) / wp
        }
    }

    /// Transform a vector.
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Transform a ray along with its differentials. The parametric range is
    /// left untouched which holds for rigid transforms.
    ///
    /// * `r` - The ray.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        let mut ray = Ray::new(self.transform_point(&r.o), self.transform_vector(&r.d), r.t_min, r.t_max);
        ray.differentials = r.differentials.map(|d| {
            RayDifferential::new(
                self.transform_point(&d.rx_origin),
                self.transform_point(&d.ry_origin),
                self.transform_vector(&d.rx_direction),
                self.transform_vector(&d.ry_direction),
            )
        });
        ray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::*;
    use float_cmp::*;

    #[test]
    fn look_at_maps_camera_axis_to_view_direction() {
        let pos = Point3f::new(1.0, 2.0, 3.0);
        let look = Point3f::new(1.0, 2.0, 10.0);
        let world_to_camera = Transform::look_at(&pos, &look, &Vector3f::new(0.0, 1.0, 0.0)).unwrap();
        let camera_to_world = world_to_camera.inverse();

        let d = camera_to_world.transform_vector(&Vector3f::new(0.0, 0.0, 1.0));
        assert!(approx_eq!(Float, d.z, 1.0, epsilon = 0.00001));

        let o = camera_to_world.transform_point(&Point3f::zero());
        assert!(approx_eq!(Float, o.distance(&pos), 0.0, epsilon = 0.00001));
    }

    #[test]
    fn look_at_with_parallel_up_is_rejected() {
        let pos = Point3f::new(0.0, 0.0, 0.0);
        let look = Point3f::new(0.0, 5.0, 0.0);
        assert!(Transform::look_at(&pos, &look, &Vector3f::new(0.0, 1.0, 0.0)).is_none());
    }
}
