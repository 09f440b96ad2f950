//! Parallel

mod barrier;
mod scheduler;
mod task_sync;
mod tile;

// Re-export.
pub use barrier::*;
pub use scheduler::*;
pub use task_sync::*;
pub use tile::*;
