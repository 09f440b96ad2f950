//! Box Filter

use engine::base::*;
use engine::filter::*;
use engine::geometry::*;

/// Weights every sample inside its square extent equally.
#[derive(Copy, Clone, Debug)]
pub struct BoxFilter {
    data: FilterData,
}

impl BoxFilter {
    /// Create a new `BoxFilter`.
    ///
    /// * `radius` - Extent in x and y; the weight is 0 beyond it.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Filter for BoxFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        let inside = abs(p.x) <= self.data.radius.x && abs(p.y) <= self.data.radius.y;
        if inside {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_inside_extent() {
        let filter = BoxFilter::new(Vector2f::new(0.5, 1.0));
        assert_eq!(filter.evaluate(&Point2f::zero()), 1.0);
        assert_eq!(filter.evaluate(&Point2f::new(0.5, -1.0)), 1.0);
        assert_eq!(filter.evaluate(&Point2f::new(0.6, 0.0)), 0.0);
        assert_eq!(filter.evaluate(&Point2f::new(0.0, 1.1)), 0.0);
    }
}
