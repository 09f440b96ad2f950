//! Filter

use crate::base::*;
use crate::geometry::*;
use std::sync::Arc;

/// Stores the common filter parameters.
#[derive(Copy, Clone, Debug)]
pub struct FilterData {
    /// Radius of the filter in x and y directions; beyond this filter is 0.
    pub radius: Vector2f,

    /// Reciprocal of radius.
    pub inv_radius: Vector2f,
}

impl FilterData {
    /// Create a new instance of `FilterData`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            radius,
            inv_radius: Vector2f::new(1.0 / radius.x, 1.0 / radius.y),
        }
    }
}

/// Filter interface for image reconstruction kernels.
pub trait Filter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData;

    /// Returns value of the filter at a given point.
    ///
    /// * `p` - The position of the sample point relative to the center of the
    ///         filter. The point should be within the filter's extent.
    fn evaluate(&self, p: &Point2f) -> Float;
}

/// Enumerated filter kinds selectable in a render job.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterType {
    Box,
    Gaussian,
    MitchellNetravali,
    Triangle,
}

impl Default for FilterType {
    fn default() -> Self {
        FilterType::Gaussian
    }
}

/// Atomic reference counted `Filter`.
pub type ArcFilter = Arc<dyn Filter + Send + Sync>;
