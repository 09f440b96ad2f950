//! Rays

use crate::base::*;
use crate::geometry::*;
use std::fmt;

/// A Ray
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Minimum extent of the ray.
    pub t_min: Float,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Auxilliary rays offset by one pixel in x and y direction.
    pub differentials: Option<RayDifferential>,
}

impl Ray {
    /// Returns a ray with no differentials.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_min` - Minimum extent of the ray.
    /// * `t_max` - Maximum extent of the ray.
    pub fn new(o: Point3f, d: Vector3f, t_min: Float, t_max: Float) -> Self {
        Self {
            o,
            d,
            t_min,
            t_max,
            differentials: None,
        }
    }

    /// Returns true if either the origin or direction has a NaN coordinate.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_max.is_nan()
    }

    /// Get position along the ray at given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns true if the ray carries differentials.
    pub fn has_differentials(&self) -> bool {
        self.differentials.is_some()
    }
}

impl Default for Ray {
    /// Returns a default value for `Ray`.
    fn default() -> Self {
        Self {
            o: Point3f::default(),
            d: Vector3f::default(),
            t_min: 0.0,
            t_max: INFINITY,
            differentials: None,
        }
    }
}

impl fmt::Display for Ray {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ray<o: {}, d: {}, t: [{}, {}]>", self.o, self.d, self.t_min, self.t_max)
    }
}

/// A ray differential is offset by one pixel in the x and y direction of a ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayDifferential {
    /// Origin of ray offset in x-direction.
    pub rx_origin: Point3f,

    /// Origin of ray offset in y-direction.
    pub ry_origin: Point3f,

    /// Direction of ray offset in x-direction.
    pub rx_direction: Vector3f,

    /// Direction of ray offset in y-direction.
    pub ry_direction: Vector3f,
}

impl RayDifferential {
    /// Returns a ray differential.
    ///
    /// * `xo` - Origin for x-direction differential.
    /// * `yo` - Origin for y-direction differential.
    /// * `xd` - Direction for x-direction differential.
    /// * `yd` - Direction for y-direction differential.
    pub fn new(xo: Point3f, yo: Point3f, xd: Vector3f, yd: Vector3f) -> Self {
        Self {
            rx_origin: xo,
            ry_origin: yo,
            rx_direction: xd,
            ry_direction: yd,
        }
    }
}
