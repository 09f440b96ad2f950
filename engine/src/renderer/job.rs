//! Render Job

use crate::camera::*;
use crate::error::*;
use crate::estimator::*;
use crate::filter::*;
use crate::parallel::DEFAULT_TILE_SIZE;
use crate::sampler::*;

/// Largest supported image side in pixels.
pub const MAX_RESOLUTION: usize = 16384;

/// Describes everything needed to set up one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderJobDesc {
    /// Image width in pixels.
    pub width: usize,

    /// Image height in pixels.
    pub height: usize,

    /// Number of sampling passes; one sample per pixel per pass.
    pub samples_per_pixel: usize,

    /// Camera placement and lens.
    pub camera: CameraParams,

    /// Light transport estimator to use.
    pub estimator: EstimatorType,

    /// Sample generator to use.
    pub sampler: SamplerType,

    /// Reconstruction filter to use.
    pub filter: FilterType,

    /// Maximum number of bounces for estimators that trace paths.
    pub max_path_length: usize,

    /// Number of render workers. `None` uses every scheduler thread.
    pub thread_count: Option<usize>,

    /// Tile edge length in pixels.
    pub tile_size: usize,

    /// Apply the film post-process when scaling the image.
    pub denoise: bool,

    /// Seed for the per-worker random number generators.
    pub seed: u64,
}

impl RenderJobDesc {
    /// Check the job can be rendered.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 || self.width > MAX_RESOLUTION || self.height > MAX_RESOLUTION {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
                max: MAX_RESOLUTION,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSampleCount);
        }
        if self.thread_count == Some(0) {
            return Err(RenderError::InvalidThreadCount);
        }
        if self.tile_size == 0 {
            return Err(RenderError::InvalidTileSize);
        }
        self.camera.validate()
    }
}

impl Default for RenderJobDesc {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            samples_per_pixel: 16,
            camera: CameraParams::default(),
            estimator: EstimatorType::default(),
            sampler: SamplerType::default(),
            filter: FilterType::default(),
            max_path_length: 5,
            thread_count: None,
            tile_size: DEFAULT_TILE_SIZE,
            denoise: false,
            seed: 0,
        }
    }
}
