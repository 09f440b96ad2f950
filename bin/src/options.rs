//! Command line options

use clap::{Parser, ValueEnum};
use engine::base::*;
use engine::camera::*;
use engine::estimator::*;
use engine::filter::*;
use engine::geometry::*;
use engine::parallel::*;
use engine::renderer::*;
use engine::sampler::*;

/// Light transport estimator selectable on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EstimatorKind {
    Constant,
    Normals,
    Ao,
    Path,
}

impl From<EstimatorKind> for EstimatorType {
    fn from(kind: EstimatorKind) -> Self {
        match kind {
            EstimatorKind::Constant => EstimatorType::Constant,
            EstimatorKind::Normals => EstimatorType::Normals,
            EstimatorKind::Ao => EstimatorType::AmbientOcclusion,
            EstimatorKind::Path => EstimatorType::Path,
        }
    }
}

/// Sampler selectable on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SamplerKind {
    Random,
    Stratified,
}

impl From<SamplerKind> for SamplerType {
    fn from(kind: SamplerKind) -> Self {
        match kind {
            SamplerKind::Random => SamplerType::Random,
            SamplerKind::Stratified => SamplerType::Stratified,
        }
    }
}

/// Reconstruction filter selectable on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterKind {
    Box,
    Gaussian,
    Mitchell,
    Triangle,
}

impl From<FilterKind> for FilterType {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Box => FilterType::Box,
            FilterKind::Gaussian => FilterType::Gaussian,
            FilterKind::Mitchell => FilterType::MitchellNetravali,
            FilterKind::Triangle => FilterType::Triangle,
        }
    }
}

/// Render options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Progressive tile based path tracer", long_about = None)]
pub struct Options {
    /// Number of render threads. Defaults to the number of logical CPUs.
    #[arg(long = "nthreads", short = 't', value_name = "NUM")]
    n_threads: Option<usize>,

    /// Image width in pixels.
    #[arg(long, short = 'x', value_name = "NUM", default_value_t = 640)]
    pub width: usize,

    /// Image height in pixels.
    #[arg(long, short = 'y', value_name = "NUM", default_value_t = 480)]
    pub height: usize,

    /// Samples per pixel; one sample per pixel is taken per pass.
    #[arg(long, short = 's', value_name = "NUM", default_value_t = 16)]
    pub spp: usize,

    /// Tile size.
    #[arg(long = "tilesize", short = 'p', value_name = "NUM", default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: usize,

    /// Light transport estimator.
    #[arg(long, value_enum, default_value_t = EstimatorKind::Path)]
    pub estimator: EstimatorKind,

    /// Sample generator.
    #[arg(long, value_enum, default_value_t = SamplerKind::Stratified)]
    pub sampler: SamplerKind,

    /// Reconstruction filter.
    #[arg(long, value_enum, default_value_t = FilterKind::Gaussian)]
    pub filter: FilterKind,

    /// Maximum number of bounces for the path estimator.
    #[arg(long = "maxdepth", value_name = "NUM", default_value_t = 5)]
    pub max_depth: usize,

    /// Camera position.
    #[arg(long, num_args = 3, value_name = "FLOAT", allow_negative_numbers = true, default_values_t = [0.0, 1.0, -6.0])]
    pub eye: Vec<Float>,

    /// Point the camera looks at.
    #[arg(long, num_args = 3, value_name = "FLOAT", allow_negative_numbers = true, default_values_t = [0.0, 0.5, 0.0])]
    pub target: Vec<Float>,

    /// Vertical field of view in degrees.
    #[arg(long, value_name = "DEGREES", default_value_t = 45.0)]
    pub fov: Float,

    /// Thin lens radius; 0 renders a pinhole camera.
    #[arg(long = "lensradius", value_name = "FLOAT", default_value_t = 0.0)]
    pub lens_radius: Float,

    /// Distance to the focus plane. Defaults to the eye to target distance.
    #[arg(long = "focusdistance", value_name = "FLOAT")]
    pub focus_distance: Option<Float>,

    /// Focal length in millimeters. Overrides `--fov` and `--lensradius`.
    #[arg(long = "focallength", value_name = "MM")]
    pub focal_length: Option<Float>,

    /// Aperture f-number used with `--focallength`. Omit for a pinhole.
    #[arg(long = "fstop", value_name = "FLOAT", requires = "focal_length")]
    pub f_stop: Option<Float>,

    /// Sensor height in millimeters used with `--focallength`.
    #[arg(long = "sensorheight", value_name = "MM", default_value_t = FULL_FRAME_SENSOR_HEIGHT_MM)]
    pub sensor_height: Float,

    /// Seed for the per-worker random number generators.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Suppress fireflies in the final image.
    #[arg(long)]
    pub denoise: bool,

    /// Path to the image file.
    #[arg(long = "outfile", short = 'o', value_name = "FILE", default_value = "render.png")]
    pub image_file: String,

    /// Suppress all text output other than error messages.
    #[arg(long)]
    pub quiet: bool,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> Option<usize> {
        let max_threads = num_cpus::get();
        match self.n_threads {
            None => None,
            Some(0) => {
                warn!("Invalid nthreads");
                Some(1)
            }
            Some(n) if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                Some(max_threads)
            }
            n => n,
        }
    }

    /// Returns the camera parameters described by the options.
    pub fn camera_params(&self) -> CameraParams {
        let defaults = CameraParams::default();
        let eye = point(&self.eye);
        let target = point(&self.target);
        let up = Vector3f::new(0.0, 1.0, 0.0);

        let mut params = match self.focal_length {
            Some(focal_length) => {
                let lens = PhysicalLens::new(focal_length, self.f_stop.unwrap_or(INFINITY), self.sensor_height);
                CameraParams::from_physical(eye, target, up, &lens, defaults.near_clip, defaults.far_clip)
            }
            None => CameraParams::new(
                eye,
                target,
                up,
                self.fov,
                defaults.near_clip,
                defaults.far_clip,
                eye.distance(&target),
                self.lens_radius,
            ),
        };
        if let Some(focus_distance) = self.focus_distance {
            params.focus_distance = focus_distance;
        }
        params
    }

    /// Returns the render job described by the options.
    pub fn job(&self) -> RenderJobDesc {
        RenderJobDesc {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.spp,
            camera: self.camera_params(),
            estimator: self.estimator.into(),
            sampler: self.sampler.into(),
            filter: self.filter.into(),
            max_path_length: self.max_depth,
            thread_count: self.threads(),
            tile_size: self.tile_size,
            denoise: self.denoise,
            seed: self.seed,
        }
    }
}

/// Convert a 3 element option value to a point.
///
/// * `v` - The coordinates.
fn point(v: &[Float]) -> Point3f {
    match v {
        [x, y, z] => Point3f::new(*x, *y, *z),
        _ => Point3f::zero(),
    }
}
