//! Camera Parameters

use crate::base::*;
use crate::error::*;
use crate::geometry::*;

/// Height of a full-frame 35mm sensor in millimeters.
pub const FULL_FRAME_SENSOR_HEIGHT_MM: Float = 24.0;

/// Scene units per millimeter; scenes are modelled in meters.
const METERS_PER_MM: Float = 0.001;

/// Canonical camera placement and lens description.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraParams {
    /// Camera position.
    pub position: Point3f,

    /// Point the camera looks at.
    pub target: Point3f,

    /// Up vector.
    pub up: Vector3f,

    /// Vertical field of view in degrees.
    pub fov: Float,

    /// Distance to the near clipping plane along the view axis.
    pub near_clip: Float,

    /// Distance to the far clipping plane along the view axis.
    pub far_clip: Float,

    /// Distance to the plane in perfect focus along the view axis.
    pub focus_distance: Float,

    /// Radius of the thin lens; 0 for a pinhole camera.
    pub lens_radius: Float,
}

/// Physical lens description convertible to and from `CameraParams`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicalLens {
    /// Focal length in millimeters.
    pub focal_length_mm: Float,

    /// Aperture f-number. `INFINITY` describes a pinhole.
    pub f_stop: Float,

    /// Sensor height in millimeters.
    pub sensor_height_mm: Float,
}

impl PhysicalLens {
    /// Create a new `PhysicalLens`.
    ///
    /// * `focal_length_mm`  - Focal length in millimeters.
    /// * `f_stop`           - Aperture f-number.
    /// * `sensor_height_mm` - Sensor height in millimeters.
    pub fn new(focal_length_mm: Float, f_stop: Float, sensor_height_mm: Float) -> Self {
        Self {
            focal_length_mm,
            f_stop,
            sensor_height_mm,
        }
    }

    /// Returns the vertical field of view in degrees.
    pub fn fov(&self) -> Float {
        degrees(2.0 * (self.sensor_height_mm / (2.0 * self.focal_length_mm)).atan())
    }

    /// Returns the lens radius in scene units.
    pub fn lens_radius(&self) -> Float {
        if self.f_stop.is_infinite() {
            0.0
        } else {
            0.5 * self.focal_length_mm / self.f_stop * METERS_PER_MM
        }
    }
}

impl CameraParams {
    /// Create new camera parameters.
    ///
    /// * `position`       - Camera position.
    /// * `target`         - Point the camera looks at.
    /// * `up`             - Up vector.
    /// * `fov`            - Vertical field of view in degrees.
    /// * `near_clip`      - Near clipping distance.
    /// * `far_clip`       - Far clipping distance.
    /// * `focus_distance` - Distance to the focus plane.
    /// * `lens_radius`    - Radius of the lens; 0 for a pinhole camera.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        fov: Float,
        near_clip: Float,
        far_clip: Float,
        focus_distance: Float,
        lens_radius: Float,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            near_clip,
            far_clip,
            focus_distance,
            lens_radius,
        }
    }

    /// Create camera parameters from a physical lens. Focus distance defaults
    /// to the distance between `position` and `target`.
    ///
    /// * `position`  - Camera position.
    /// * `target`    - Point the camera looks at.
    /// * `up`        - Up vector.
    /// * `lens`      - The physical lens.
    /// * `near_clip` - Near clipping distance.
    /// * `far_clip`  - Far clipping distance.
    pub fn from_physical(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        lens: &PhysicalLens,
        near_clip: Float,
        far_clip: Float,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov: lens.fov(),
            near_clip,
            far_clip,
            focus_distance: position.distance(&target),
            lens_radius: lens.lens_radius(),
        }
    }

    /// Returns the physical lens that produces this field of view and lens
    /// radius on a sensor of the given height.
    ///
    /// * `sensor_height_mm` - Sensor height in millimeters.
    pub fn physical_lens(&self, sensor_height_mm: Float) -> PhysicalLens {
        let focal_length_mm = sensor_height_mm / (2.0 * (0.5 * radians(self.fov)).tan());
        let f_stop = if self.lens_radius > 0.0 {
            focal_length_mm * METERS_PER_MM / (2.0 * self.lens_radius)
        } else {
            INFINITY
        };
        PhysicalLens::new(focal_length_mm, f_stop, sensor_height_mm)
    }

    /// Check the parameters describe a usable view.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: &str| Err(RenderError::InvalidCamera(msg.to_string()));

        if self.position.has_nans() || self.target.has_nans() || self.up.has_nans() {
            invalid("camera placement has NaN coordinates")
        } else if !(self.fov > 0.0 && self.fov < 180.0) {
            invalid("field of view must be in (0, 180) degrees")
        } else if !(self.near_clip > 0.0 && self.far_clip > self.near_clip) {
            invalid("clip planes must satisfy 0 < near < far")
        } else if !(self.focus_distance > 0.0) {
            invalid("focus distance must be positive")
        } else if !(self.lens_radius >= 0.0 && self.lens_radius.is_finite()) {
            invalid("lens radius must be finite and non-negative")
        } else {
            Ok(())
        }
    }
}

impl Default for CameraParams {
    /// Returns a pinhole camera at (0, 0, -5) looking at the origin.
    fn default() -> Self {
        Self::new(
            Point3f::new(0.0, 0.0, -5.0),
            Point3f::zero(),
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            0.1,
            1000.0,
            5.0,
            0.0,
        )
    }
}
