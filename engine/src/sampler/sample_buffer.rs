//! Sample Buffer

use crate::base::*;
use crate::geometry::*;

/// Stores the sample values needed to generate a camera ray.
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraSample {
    /// Point on the film to which the generated ray carries radiance. The
    /// sampler writes an offset within the pixel; the render loop adds the
    /// pixel coordinates before the sample reaches the camera.
    pub p_film: Point2f,

    /// The point on the lens the ray passes through.
    pub p_lens: Point2f,

    /// Time at which the ray should sample the scene.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film to which the generated ray carries radiance.
    /// * `p_lens` - The point on the lens the ray passes through.
    /// * `time`   - Time at which the ray should sample the scene.
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self { p_film, p_lens, time }
    }
}

/// Per-pixel sample state. The layout of the auxiliary arrays is declared once
/// by the estimator through `request_1d_array()`/`request_2d_array()` and every
/// worker then renders with its own clone.
#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    /// Pixel offset, lens offset and time.
    pub camera: CameraSample,

    /// The requested 1D sample arrays.
    pub array_1d: Vec<Vec<Float>>,

    /// The requested 2D sample arrays.
    pub array_2d: Vec<Vec<Point2f>>,
}

impl SampleBuffer {
    /// Create an empty `SampleBuffer` with no auxiliary arrays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an array of `n` 1D samples per pixel sample. Returns the index
    /// used to retrieve the array with `get_1d_array()`.
    ///
    /// * `n` - The number of samples.
    pub fn request_1d_array(&mut self, n: usize) -> usize {
        self.array_1d.push(vec![0.0; n]);
        self.array_1d.len() - 1
    }

    /// Request an array of `n` 2D samples per pixel sample. Returns the index
    /// used to retrieve the array with `get_2d_array()`.
    ///
    /// * `n` - The number of samples.
    pub fn request_2d_array(&mut self, n: usize) -> usize {
        self.array_2d.push(vec![Point2f::zero(); n]);
        self.array_2d.len() - 1
    }

    /// Returns a previously requested 1D array.
    ///
    /// * `index` - Index returned by `request_1d_array()`.
    pub fn get_1d_array(&self, index: usize) -> &[Float] {
        &self.array_1d[index]
    }

    /// Returns a previously requested 2D array.
    ///
    /// * `index` - Index returned by `request_2d_array()`.
    pub fn get_2d_array(&self, index: usize) -> &[Point2f] {
        &self.array_2d[index]
    }

    /// Shift the film sample from pixel-relative to raster coordinates.
    ///
    /// * `pixel` - The pixel being rendered.
    pub fn offset_to_pixel(&mut self, pixel: &Point2i) {
        self.camera.p_film = self.camera.p_film + Vector2f::new(pixel.x as Float, pixel.y as Float);
    }
}
