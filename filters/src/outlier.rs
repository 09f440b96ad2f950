//! Outlier Rejection

use engine::base::*;
use engine::film::*;
use engine::spectrum::*;

/// Film post-process that suppresses isolated fireflies. A pixel whose
/// luminance exceeds the mean of its 3x3 neighbourhood by more than
/// `threshold` standard deviations is replaced by the neighbourhood mean.
pub struct OutlierRejection {
    /// Number of standard deviations above the mean a pixel may reach.
    pub threshold: Float,
}

impl OutlierRejection {
    /// Create a new `OutlierRejection` post-process.
    ///
    /// * `threshold` - Number of standard deviations above the neighbourhood
    ///                 mean a pixel may reach.
    pub fn new(threshold: Float) -> Self {
        Self { threshold }
    }
}

impl Default for OutlierRejection {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl FilmPostProcess for OutlierRejection {
    /// Replace outliers in place. Neighbourhoods are read from the
    /// unprocessed image so replacements do not cascade.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    /// * `image`  - Row-major pixel values.
    fn process(&self, width: usize, height: usize, image: &mut [Spectrum]) {
        let source = image.to_vec();
        let mut rejected = 0;

        for y in 0..height {
            for x in 0..width {
                let mut sum = Spectrum::ZERO;
                let mut lum_sum = 0.0;
                let mut lum_sq_sum = 0.0;
                let mut n = 0;

                for ny in y.saturating_sub(1)..min(y + 2, height) {
                    for nx in x.saturating_sub(1)..min(x + 2, width) {
                        if nx == x && ny == y {
                            continue;
                        }
                        let s = source[ny * width + nx];
                        let lum = s.y();
                        sum += s;
                        lum_sum += lum;
                        lum_sq_sum += lum * lum;
                        n += 1;
                    }
                }
                if n == 0 {
                    continue;
                }

                let inv_n = 1.0 / n as Float;
                let mean = lum_sum * inv_n;
                let std_dev = max(0.0, lum_sq_sum * inv_n - mean * mean).sqrt();
                let lum = source[y * width + x].y();
                if lum > mean + self.threshold * std_dev && lum > mean * (1.0 + self.threshold) {
                    image[y * width + x] = sum * inv_n;
                    rejected += 1;
                }
            }
        }

        if rejected > 0 {
            debug!("Outlier rejection replaced {} pixels", rejected);
        }
    }
}
