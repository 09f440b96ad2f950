//! Integrators

#[macro_use]
extern crate log;

mod ambient_occlusion;
mod common;
mod constant;
mod normals;
mod path;

// Re-export.
pub use ambient_occlusion::*;
pub use common::*;
pub use constant::*;
pub use normals::*;
pub use path::*;
