//! Camera

mod params;

use crate::base::*;
use crate::error::*;
use crate::geometry::*;
use crate::sampler::CameraSample;
use crate::sampling::*;

// Re-export.
pub use params::*;

/// A thin-lens perspective camera. A `Camera` is immutable; changing its
/// parameters or resolution produces a new value that the renderer swaps in
/// between passes.
#[derive(Clone, Debug)]
pub struct Camera {
    /// The parameters the camera was built from.
    params: CameraParams,

    /// Image width in pixels.
    width: usize,

    /// Image height in pixels.
    height: usize,

    /// Camera space to world space transformation.
    camera_to_world: Transform,

    /// Distance from the eye to the image plane in pixel units.
    image_plane_dist: Float,

    /// Differential change in camera space position for one pixel step in x.
    dx_camera: Vector3f,

    /// Differential change in camera space position for one pixel step in y.
    dy_camera: Vector3f,
}

impl Camera {
    /// Create a new camera.
    ///
    /// * `params` - Camera placement and lens.
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn new(params: CameraParams, width: usize, height: usize) -> Result<Self, RenderError> {
        params.validate()?;

        let world_to_camera = Transform::look_at(&params.position, &params.target, &params.up).ok_or_else(|| {
            RenderError::InvalidCamera(String::from("view direction is degenerate or parallel to up vector"))
        })?;

        let mut camera = Self {
            params,
            width: 0,
            height: 0,
            camera_to_world: world_to_camera.inverse(),
            image_plane_dist: 0.0,
            dx_camera: Vector3f::zero(),
            dy_camera: Vector3f::zero(),
        };
        camera.set_resolution(width, height);
        Ok(camera)
    }

    /// Returns a camera with the same placement and lens rendering at a new
    /// resolution.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn resize(&self, width: usize, height: usize) -> Self {
        let mut camera = self.clone();
        camera.set_resolution(width, height);
        camera
    }

    /// Recompute the resolution dependent terms.
    fn set_resolution(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.image_plane_dist = height as Float * 0.5 / (0.5 * radians(self.params.fov)).tan();

        let origin = self.raster_to_camera(&Point2f::new(0.0, 0.0));
        self.dx_camera = self.raster_to_camera(&Point2f::new(1.0, 0.0)) - origin;
        self.dy_camera = self.raster_to_camera(&Point2f::new(0.0, 1.0)) - origin;
    }

    /// Map a continuous raster position to a point on the camera space image
    /// plane. Raster y grows downwards while camera y grows upwards.
    ///
    /// * `p_raster` - The raster position.
    pub fn raster_to_camera(&self, p_raster: &Point2f) -> Point3f {
        Point3f::new(
            p_raster.x - 0.5 * self.width as Float,
            0.5 * self.height as Float - p_raster.y,
            self.image_plane_dist,
        )
    }

    /// Returns a world space ray for a given sample.
    ///
    /// * `sample`         - The camera sample with `p_film` in raster space.
    /// * `force_pin_hole` - Ignore the lens even if `lens_radius > 0`.
    pub fn generate_ray(&self, sample: &CameraSample, force_pin_hole: bool) -> Ray {
        let p_camera = self.raster_to_camera(&sample.p_film);
        let d = Vector3f::from(p_camera).normalize();
        let mut ray = self.clipped_ray(Point3f::zero(), d);

        // Modify ray for depth of field.
        if self.params.lens_radius > 0.0 && !force_pin_hole {
            let o = self.lens_point(&sample.p_lens);
            let p_focus = self.focus_point(&d);
            ray = self.clipped_ray(o, (p_focus - o).normalize());
        }

        self.camera_to_world.transform_ray(&ray)
    }

    /// Returns a main ray and rays shifted one pixel in x and y directions on
    /// the film plane.
    ///
    /// * `sample` - The camera sample with `p_film` in raster space.
    pub fn generate_ray_differential(&self, sample: &CameraSample) -> Ray {
        let p_camera = self.raster_to_camera(&sample.p_film);
        let d = Vector3f::from(p_camera).normalize();
        let dx = (Vector3f::from(p_camera) + self.dx_camera).normalize();
        let dy = (Vector3f::from(p_camera) + self.dy_camera).normalize();

        let mut ray = if self.params.lens_radius > 0.0 {
            // All three rays leave from the same lens point and converge on
            // their own points on the focus plane.
            let o = self.lens_point(&sample.p_lens);

            let mut ray = self.clipped_ray(o, (self.focus_point(&d) - o).normalize());
            ray.differentials = Some(RayDifferential::new(
                o,
                o,
                (self.focus_point(&dx) - o).normalize(),
                (self.focus_point(&dy) - o).normalize(),
            ));
            ray
        } else {
            let o = Point3f::zero();
            let mut ray = self.clipped_ray(o, d);
            ray.differentials = Some(RayDifferential::new(o, o, dx, dy));
            ray
        };

        if ray.has_nans() {
            warn!("Camera generated a ray with NaN values for {}", sample.p_film);
            ray.differentials = None;
        }

        self.camera_to_world.transform_ray(&ray)
    }

    /// Camera space point on the lens for a lens sample.
    fn lens_point(&self, u: &Point2f) -> Point3f {
        let p_lens = self.params.lens_radius * concentric_sample_disk(u);
        Point3f::new(p_lens.x, p_lens.y, 0.0)
    }

    /// Camera space point on the focus plane along a ray from the eye.
    fn focus_point(&self, d: &Vector3f) -> Point3f {
        let ft = self.params.focus_distance / d.z;
        Point3f::zero() + *d * ft
    }

    /// Camera space ray whose parametric range spans the clip planes.
    fn clipped_ray(&self, o: Point3f, d: Vector3f) -> Ray {
        let inv_z = 1.0 / d.z;
        Ray::new(
            o,
            d,
            (self.params.near_clip - o.z) * inv_z,
            (self.params.far_clip - o.z) * inv_z,
        )
    }

    /// Returns the parameters the camera was built from.
    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    /// Returns the image resolution as `(width, height)`.
    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the lens radius.
    pub fn lens_radius(&self) -> Float {
        self.params.lens_radius
    }

    /// Returns the focus plane distance.
    pub fn focus_distance(&self) -> Float {
        self.params.focus_distance
    }

    /// Returns the distance to the image plane in pixel units.
    pub fn image_plane_dist(&self) -> Float {
        self.image_plane_dist
    }

    /// Returns the per-pixel camera space differentials in x and y.
    pub fn differentials(&self) -> (Vector3f, Vector3f) {
        (self.dx_camera, self.dy_camera)
    }

    /// Returns the camera to world transform.
    pub fn camera_to_world(&self) -> &Transform {
        &self.camera_to_world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn look_down_x(lens_radius: Float) -> CameraParams {
        CameraParams::new(
            Point3f::new(-4.0, 1.0, 0.0),
            Point3f::new(6.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            0.5,
            50.0,
            10.0,
            lens_radius,
        )
    }

    fn sample_at(x: Float, y: Float) -> CameraSample {
        CameraSample::new(Point2f::new(x, y), Point2f::new(0.5, 0.5), 0.0)
    }

    fn assert_vec_eq(a: &Vector3f, b: &Vector3f) {
        assert!(approx_eq!(f32, a.x, b.x, epsilon = 1e-5), "{} != {}", a, b);
        assert!(approx_eq!(f32, a.y, b.y, epsilon = 1e-5), "{} != {}", a, b);
        assert!(approx_eq!(f32, a.z, b.z, epsilon = 1e-5), "{} != {}", a, b);
    }

    #[test]
    fn principal_pixel_center_goes_through_target() {
        let params = look_down_x(0.0);
        let camera = Camera::new(params, 101, 101).unwrap();

        let ray = camera.generate_ray(&sample_at(50.5, 50.5), false);
        let expected = (params.target - params.position).normalize();
        assert_vec_eq(&ray.d, &expected);

        let hit = ray.at(params.position.distance(&params.target));
        assert!(approx_eq!(f32, hit.distance(&params.target), 0.0, epsilon = 1e-4));
    }

    #[test]
    fn image_plane_distance_matches_fov() {
        let camera = Camera::new(look_down_x(0.0), 200, 100).unwrap();
        // tan(30 deg) = 50 / d.
        assert!(approx_eq!(f32, camera.image_plane_dist(), 86.60254, epsilon = 1e-3));
        let (dx, dy) = camera.differentials();
        assert_vec_eq(&dx, &Vector3f::new(1.0, 0.0, 0.0));
        assert_vec_eq(&dy, &Vector3f::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn raster_axes_map_to_screen_directions() {
        let camera = Camera::new(look_down_x(0.0), 64, 64).unwrap();
        let top = camera.generate_ray(&sample_at(32.0, 0.0), false);
        let bottom = camera.generate_ray(&sample_at(32.0, 64.0), false);
        assert!(top.d.y > 0.0);
        assert!(bottom.d.y < 0.0);
    }

    #[test]
    fn clip_planes_bound_the_ray() {
        let params = look_down_x(0.0);
        let camera = Camera::new(params, 64, 48).unwrap();
        let ray = camera.generate_ray(&sample_at(3.0, 40.0), false);

        let view = (params.target - params.position).normalize();
        let near = (ray.at(ray.t_min) - params.position).dot(&view);
        let far = (ray.at(ray.t_max) - params.position).dot(&view);
        assert!(approx_eq!(f32, near, params.near_clip, epsilon = 1e-4));
        assert!(approx_eq!(f32, far, params.far_clip, epsilon = 1e-2));
    }

    #[test]
    fn differentials_match_neighbouring_pixels() {
        let camera = Camera::new(look_down_x(0.0), 80, 60).unwrap();
        let ray = camera.generate_ray_differential(&sample_at(10.25, 20.75));
        let rd = ray.differentials.unwrap();

        let rx = camera.generate_ray(&sample_at(11.25, 20.75), false);
        let ry = camera.generate_ray(&sample_at(10.25, 21.75), false);
        assert_vec_eq(&rd.rx_direction, &rx.d);
        assert_vec_eq(&rd.ry_direction, &ry.d);
        assert_vec_eq(&Vector3f::from(rd.rx_origin), &Vector3f::from(ray.o));
    }

    #[test]
    fn lens_rays_converge_on_focus_plane() {
        let params = look_down_x(0.25);
        let camera = Camera::new(params, 64, 64).unwrap();

        let mut sample = sample_at(20.0, 40.0);
        let mut focus_points = vec![];
        for u in [(0.1, 0.9), (0.8, 0.2), (0.5, 0.6)] {
            sample.p_lens = Point2f::new(u.0, u.1);
            let ray = camera.generate_ray(&sample, false);
            // Focus plane is x = -4 + 10 = 6 in world space.
            let t = (6.0 - ray.o.x) / ray.d.x;
            focus_points.push(ray.at(t));
        }
        for p in &focus_points[1..] {
            assert!(approx_eq!(f32, p.distance(&focus_points[0]), 0.0, epsilon = 1e-3));
        }

        let pinhole = camera.generate_ray(&sample, true);
        assert!(approx_eq!(f32, pinhole.o.distance(&params.position), 0.0, epsilon = 1e-5));
    }

    #[test]
    fn resize_keeps_world_placement() {
        let params = look_down_x(0.0);
        let camera = Camera::new(params, 64, 64).unwrap();
        let resized = camera.resize(129, 33);

        assert_eq!(resized.resolution(), (129, 33));
        assert_eq!(resized.params(), camera.params());
        let ray = resized.generate_ray(&sample_at(64.5, 16.5), false);
        assert_vec_eq(&ray.d, &(params.target - params.position).normalize());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut params = look_down_x(0.0);
        params.up = Vector3f::new(1.0, 0.0, 0.0);
        assert!(matches!(Camera::new(params, 8, 8), Err(RenderError::InvalidCamera(_))));
    }
}
