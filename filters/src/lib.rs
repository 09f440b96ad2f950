//! Filters

#[macro_use]
extern crate log;

mod boxf; // box is reserved keyword
mod gaussian;
mod mitchell;
mod outlier;
mod triangle;

// Re-export.
pub use boxf::*;
pub use gaussian::*;
pub use mitchell::*;
pub use outlier::*;
pub use triangle::*;

use engine::filter::*;
use engine::geometry::*;
use std::sync::Arc;

/// Returns a filter of the given kind with its default radius and shape
/// parameters.
///
/// * `filter_type` - The filter kind.
pub fn default_filter(filter_type: FilterType) -> ArcFilter {
    match filter_type {
        FilterType::Box => Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5))),
        FilterType::Gaussian => Arc::new(GaussianFilter::new(Vector2f::new(2.0, 2.0), 2.0)),
        FilterType::MitchellNetravali => Arc::new(MitchellFilter::new(Vector2f::new(2.0, 2.0), 1.0 / 3.0, 1.0 / 3.0)),
        FilterType::Triangle => Arc::new(TriangleFilter::new(Vector2f::new(2.0, 2.0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::base::*;
    use proptest::prelude::*;

    const ALL: [FilterType; 4] = [
        FilterType::Box,
        FilterType::Gaussian,
        FilterType::MitchellNetravali,
        FilterType::Triangle,
    ];

    #[test]
    fn filters_peak_at_center() {
        for filter_type in ALL {
            let filter = default_filter(filter_type);
            let center = filter.evaluate(&Point2f::zero());
            let r = filter.get_data().radius;
            let off = filter.evaluate(&Point2f::new(0.5 * r.x, 0.0));
            assert!(center > 0.0, "{:?}", filter_type);
            assert!(center >= off, "{:?}", filter_type);
        }
    }

    proptest! {
        #[test]
        fn filters_vanish_outside_radius(
            dx in 1.001f32..4.0,
            dy in -1.0f32..1.0,
            flip in proptest::bool::ANY,
        ) {
            for filter_type in ALL {
                let filter = default_filter(filter_type);
                let r = filter.get_data().radius;
                let (x, y) = (dx * r.x, dy * r.y);
                let p = if flip { Point2f::new(y, -x) } else { Point2f::new(-x, y) };
                prop_assert_eq!(filter.evaluate(&p), 0.0 as Float, "{:?} at {}", filter_type, p);
            }
        }
    }
}
