//! Scene

use crate::base::*;
use crate::geometry::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Records where a ray hit a surface and the shading data estimators need.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceHit {
    /// Parametric distance along the ray.
    pub t: Float,

    /// World space hit point.
    pub p: Point3f,

    /// Unit surface normal facing out of the surface.
    pub n: Vector3f,

    /// Diffuse reflectance of the surface.
    pub albedo: Spectrum,

    /// Radiance emitted by the surface.
    pub emission: Spectrum,
}

/// Scene interface. The renderer owns the scene, triggers its acceleration
/// build once and then shares it read-only with every worker.
pub trait Scene {
    /// Build the spatial acceleration structure. Called once before rendering.
    fn build_accelerator(&mut self);

    /// Returns the bounding box of the scene geometry.
    fn world_bound(&self) -> Bounds3f;

    /// Traces the ray into the scene and returns the closest hit, if any,
    /// within `[ray.t_min, ray.t_max]`.
    ///
    /// * `ray` - The ray to trace.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;

    /// Traces the ray into the scene and returns whether or not an
    /// intersection occurred.
    ///
    /// * `ray` - The ray to trace.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// Radiance arriving along a ray that escapes the scene.
    ///
    /// * `ray` - The escaping ray.
    fn background(&self, _ray: &Ray) -> Spectrum {
        Spectrum::ZERO
    }
}

/// Atomic reference counted `Scene`.
pub type ArcScene = Arc<dyn Scene + Send + Sync>;
