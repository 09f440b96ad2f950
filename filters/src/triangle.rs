//! Triangle Filter

use engine::base::*;
use engine::filter::*;
use engine::geometry::*;

/// Tent filter whose weight falls off linearly from 1 at the center to 0 at
/// the radius along each axis.
#[derive(Copy, Clone, Debug)]
pub struct TriangleFilter {
    data: FilterData,
}

impl TriangleFilter {
    /// Create a new `TriangleFilter`.
    ///
    /// * `radius` - Extent in x and y; the weight is 0 beyond it.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Filter for TriangleFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        let tx = max(0.0, 1.0 - abs(p.x) * self.data.inv_radius.x);
        let ty = max(0.0, 1.0 - abs(p.y) * self.data.inv_radius.y);
        tx * ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn falls_off_linearly() {
        let filter = TriangleFilter::new(Vector2f::new(2.0, 2.0));
        assert_eq!(filter.evaluate(&Point2f::zero()), 1.0);
        assert!(approx_eq!(f32, filter.evaluate(&Point2f::new(1.0, 0.0)), 0.5, ulps = 2));
        assert!(approx_eq!(f32, filter.evaluate(&Point2f::new(1.0, 1.0)), 0.25, ulps = 2));
        assert_eq!(filter.evaluate(&Point2f::new(2.5, 0.0)), 0.0);
    }
}
