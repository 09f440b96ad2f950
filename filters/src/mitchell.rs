//! Mitchell Filter

use engine::base::*;
use engine::filter::*;
use engine::geometry::*;

/// Implements the Mitchell-Netravali filter, a separable cubic that trades
/// ringing against blurring through its `B` and `C` parameters.
#[derive(Copy, Clone, Debug)]
pub struct MitchellFilter {
    data: FilterData,

    /// Parameter `B`.
    b: Float,

    /// Parameter `C`.
    c: Float,
}

impl MitchellFilter {
    /// Returns a new instance of `MitchellFilter`. Ideally the 2 parameters
    /// `B` and `C` should satisfy `B + 2C = 1`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    /// * `b`      - Parameter `B`.
    /// * `c`      - Parameter `C`.
    pub fn new(radius: Vector2f, b: Float, c: Float) -> Self {
        Self {
            data: FilterData::new(radius),
            b,
            c,
        }
    }

    /// Calculates the 1D filter function over [-1, 1].
    ///
    /// * `x` - Distance from center of filter relative to the radius.
    fn mitchell_1d(&self, x: Float) -> Float {
        let x = abs(2.0 * x);
        if x >= 2.0 {
            0.0
        } else if x > 1.0 {
            ((-self.b - 6.0 * self.c) * x * x * x
                + (6.0 * self.b + 30.0 * self.c) * x * x
                + (-12.0 * self.b - 48.0 * self.c) * x
                + (8.0 * self.b + 24.0 * self.c))
                * (1.0 / 6.0)
        } else {
            ((12.0 - 9.0 * self.b - 6.0 * self.c) * x * x * x
                + (-18.0 + 12.0 * self.b + 6.0 * self.c) * x * x
                + (6.0 - 2.0 * self.b))
                * (1.0 / 6.0)
        }
    }
}

impl Filter for MitchellFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        self.mitchell_1d(p.x * self.data.inv_radius.x) * self.mitchell_1d(p.y * self.data.inv_radius.y)
    }
}
