//! Engine

#[macro_use]
extern crate log;
#[macro_use]
extern crate hexf;

pub mod base;
pub mod camera;
pub mod error;
pub mod estimator;
pub mod film;
pub mod filter;
pub mod geometry;
pub mod memory;
pub mod parallel;
pub mod renderer;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod spectrum;
