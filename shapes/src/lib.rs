//! Shapes

#[macro_use]
extern crate log;

mod bvh;
mod sphere;
mod sphere_scene;

// Re-export.
pub use bvh::*;
pub use sphere::*;
pub use sphere_scene::*;
