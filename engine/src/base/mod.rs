//! Common numeric stuff

mod common;

// Re-export
pub use common::*;
