//! 3D Axis Aligned Bounding Boxes.

use crate::base::*;
use crate::geometry::*;

/// 3D Axis Aligned Bounding Box containing `Float` points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// Box whose minimum is greater than its maximum, so it can be grown from
    /// nothing.
    pub const EMPTY: Self = Self {
        p_min: Point3f {
            x: Float::MAX,
            y: Float::MAX,
            z: Float::MAX,
        },
        p_max: Point3f {
            x: Float::MIN,
            y: Float::MIN,
            z: Float::MIN,
        },
    };

    /// Creates a new bounding box from 2 points.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns the union of two boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }

    /// Returns the center of the box.
    pub fn centroid(&self) -> Point3f {
        Point3f::new(
            0.5 * (self.p_min.x + self.p_max.x),
            0.5 * (self.p_min.y + self.p_max.y),
            0.5 * (self.p_min.z + self.p_max.z),
        )
    }

    /// Returns the index of the longest axis.
    pub fn maximum_extent(&self) -> usize {
        let d = self.p_max - self.p_min;
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Returns true if the ray's `[t_min, t_max]` segment overlaps the box.
    /// Uses the slab test.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for axis in 0..3 {
            let inv_d = 1.0 / ray.d[axis];
            let mut t_near = (self.p_min[axis] - ray.o[axis]) * inv_d;
            let mut t_far = (self.p_max[axis] - ray.o[axis]) * inv_d;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // NaN comparisons fall through to keep the current interval.
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}
